//! This file serves as the root for all SeaORM entity modules.
//! Users borrow books; every book is written by one author. Rows are only
//! ever inserted or deleted, never updated in place.

pub mod author;
pub mod book;
pub mod borrow;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::author::Entity as Author;
    pub use super::book::Entity as Book;
    pub use super::borrow::Entity as Borrow;
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use chrono::{Duration, Utc};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        // Connect to the SQLite database
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let reader = user::ActiveModel {
            name: Set("Reader".to_string()),
            email: Set("reader@example.com".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let lem = author::ActiveModel {
            name: Set("Stanislaw Lem".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let solaris = book::ActiveModel {
            title: Set("Solaris".to_string()),
            author_id: Set(lem.id),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let fiasco = book::ActiveModel {
            title: Set("Fiasco".to_string()),
            author_id: Set(lem.id),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let before = Utc::now() - Duration::seconds(1);
        let loan = borrow::ActiveModel::new_now(reader.id, solaris.id)
            .insert(&db)
            .await?;
        assert!(loan.borrow_date >= before);
        assert!(loan.borrow_date <= Utc::now() + Duration::seconds(1));

        // Author -> books
        let books = lem.find_related(Book).all(&db).await?;
        assert_eq!(books.len(), 2);
        assert!(books.iter().any(|b| b.id == fiasco.id));

        // Book -> author
        let author = solaris.find_related(Author).one(&db).await?;
        assert_eq!(author.map(|a| a.name), Some("Stanislaw Lem".to_string()));

        // User -> borrows and book -> borrows
        let by_user = reader.find_related(Borrow).all(&db).await?;
        assert_eq!(by_user.len(), 1);
        assert_eq!(by_user[0].book_id, solaris.id);

        let by_book = Borrow::find()
            .filter(borrow::Column::BookId.eq(fiasco.id))
            .all(&db)
            .await?;
        assert!(by_book.is_empty());

        // The stored timestamp survives a round trip through SQLite
        let reloaded = Borrow::find_by_id(loan.id).one(&db).await?.unwrap();
        let drift = (reloaded.borrow_date - loan.borrow_date).num_milliseconds().abs();
        assert!(drift < 1000);

        Ok(())
    }

    #[tokio::test]
    async fn test_borrow_requires_existing_user_and_book() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let result = borrow::ActiveModel::new_now(1, 1).insert(&db).await;
        assert!(result.is_err());
        assert_eq!(Borrow::find().all(&db).await?.len(), 0);

        Ok(())
    }
}
