use crate::entity_iden::EntityIden;
use model::entities::prelude::*;
use model::entities::{author, book, borrow, user};
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(User::table())
                    .if_not_exists()
                    .col(pk_auto(User::column(user::Column::Id)))
                    .col(string_len(User::column(user::Column::Name), 100))
                    .col(string_len(User::column(user::Column::Email), 100).unique_key())
                    .to_owned(),
            )
            .await?;

        // Create authors table
        manager
            .create_table(
                Table::create()
                    .table(Author::table())
                    .if_not_exists()
                    .col(pk_auto(Author::column(author::Column::Id)))
                    .col(string_len(Author::column(author::Column::Name), 100))
                    .to_owned(),
            )
            .await?;

        // Create books table
        manager
            .create_table(
                Table::create()
                    .table(Book::table())
                    .if_not_exists()
                    .col(pk_auto(Book::column(book::Column::Id)))
                    .col(string_len(Book::column(book::Column::Title), 200))
                    .col(integer(Book::column(book::Column::AuthorId)))
                    .foreign_key(
                        ForeignKey::create()
                            .name(Book::foreign_key_name(book::Column::AuthorId))
                            .from(Book::table(), Book::column(book::Column::AuthorId))
                            .to(Author::table(), Author::column(author::Column::Id))
                            .on_delete(ForeignKeyAction::NoAction)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        // Create borrows table
        manager
            .create_table(
                Table::create()
                    .table(Borrow::table())
                    .if_not_exists()
                    .col(pk_auto(Borrow::column(borrow::Column::Id)))
                    .col(integer(Borrow::column(borrow::Column::UserId)))
                    .col(integer(Borrow::column(borrow::Column::BookId)))
                    .col(
                        timestamp_with_time_zone(Borrow::column(borrow::Column::BorrowDate))
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(Borrow::foreign_key_name(borrow::Column::UserId))
                            .from(Borrow::table(), Borrow::column(borrow::Column::UserId))
                            .to(User::table(), User::column(user::Column::Id))
                            .on_delete(ForeignKeyAction::NoAction)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(Borrow::foreign_key_name(borrow::Column::BookId))
                            .from(Borrow::table(), Borrow::column(borrow::Column::BookId))
                            .to(Book::table(), Book::column(book::Column::Id))
                            .on_delete(ForeignKeyAction::NoAction)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        // Indexes backing the relation lookups
        manager
            .create_index(
                Index::create()
                    .name(Book::index_name(book::Column::AuthorId))
                    .table(Book::table())
                    .col(Book::column(book::Column::AuthorId))
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(Borrow::index_name(borrow::Column::UserId))
                    .table(Borrow::table())
                    .col(Borrow::column(borrow::Column::UserId))
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(Borrow::index_name(borrow::Column::BookId))
                    .table(Borrow::table())
                    .col(Borrow::column(borrow::Column::BookId))
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(Borrow::table()).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Book::table()).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Author::table()).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(User::table()).to_owned())
            .await?;

        Ok(())
    }
}
