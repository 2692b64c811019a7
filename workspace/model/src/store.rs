//! Generic data-access operations shared by every entity.
//!
//! Each operation issues a single statement against the connection it is
//! handed, so callers may pass the pooled `DatabaseConnection` or an open
//! `DatabaseTransaction` when several reads have to see the same snapshot.
//! Rows always come back in primary key order, which for autoincrement keys
//! is insertion order.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, Iterable,
    PrimaryKeyToColumn, PrimaryKeyTrait, QueryFilter, QueryOrder, Select, SqlErr, Value,
};
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Errors raised by the storage layer
#[derive(Error, Debug)]
pub enum StoreError {
    /// A uniqueness or foreign-key constraint rejected the statement
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(DbErr),
}

impl From<DbErr> for StoreError {
    fn from(error: DbErr) -> Self {
        match error.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message)) => {
                warn!("Unique constraint violated: {}", message);
                StoreError::ConstraintViolation(message)
            }
            Some(SqlErr::ForeignKeyConstraintViolation(message)) => {
                warn!("Foreign key constraint violated: {}", message);
                StoreError::ConstraintViolation(message)
            }
            _ => {
                // SQLite reports e.g. "FOREIGN KEY constraint failed" without an extended code
                let message = error.to_string();
                if message.contains("constraint failed") {
                    warn!("Constraint violated: {}", message);
                    StoreError::ConstraintViolation(message)
                } else {
                    StoreError::Database(error)
                }
            }
        }
    }
}

/// Type alias for Result with StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

fn table_name<E: EntityTrait>() -> String {
    E::default().table_name().to_string()
}

fn ordered<E: EntityTrait>(select: Select<E>) -> Select<E> {
    <E::PrimaryKey as Iterable>::iter()
        .fold(select, |select, key| select.order_by_asc(key.into_column()))
}

/// Persists a new record and returns the id assigned by the database.
pub async fn insert<A, C>(db: &C, model: A) -> Result<i32>
where
    A: ActiveModelTrait + 'static,
    C: ConnectionTrait,
    <<A::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType: Into<i32>,
{
    trace!("Inserting into {}", table_name::<A::Entity>());
    let result = <A::Entity as EntityTrait>::insert(model).exec(db).await?;
    let id = result.last_insert_id.into();
    debug!("Inserted {} row with id {}", table_name::<A::Entity>(), id);
    Ok(id)
}

/// Looks a record up by id. A missing id yields `None`, never an error.
pub async fn get_by_id<E, C>(db: &C, id: i32) -> Result<Option<E::Model>>
where
    E: EntityTrait,
    C: ConnectionTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    trace!("Fetching {} row with id {}", table_name::<E>(), id);
    Ok(E::find_by_id(id).one(db).await?)
}

/// Returns every record of the entity. Unbounded.
pub async fn list_all<E, C>(db: &C) -> Result<Vec<E::Model>>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    trace!("Listing all {} rows", table_name::<E>());
    let rows = ordered(E::find()).all(db).await?;
    debug!("Fetched {} {} rows", rows.len(), table_name::<E>());
    Ok(rows)
}

/// Returns the records whose `column` equals `value`.
pub async fn filter_by_field<E, C, V>(db: &C, column: E::Column, value: V) -> Result<Vec<E::Model>>
where
    E: EntityTrait,
    C: ConnectionTrait,
    V: Into<Value>,
{
    let value = value.into();
    trace!("Filtering {} rows on {:?} = {:?}", table_name::<E>(), column, value);
    let rows = ordered(E::find().filter(column.eq(value))).all(db).await?;
    debug!("Matched {} {} rows", rows.len(), table_name::<E>());
    Ok(rows)
}

/// Removes a record by id and reports whether a row was deleted.
///
/// Dependent rows are left alone; when foreign keys are enforced a still
/// referenced row fails with [`StoreError::ConstraintViolation`].
pub async fn delete_by_id<E, C>(db: &C, id: i32) -> Result<bool>
where
    E: EntityTrait,
    C: ConnectionTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    trace!("Deleting {} row with id {}", table_name::<E>(), id);
    let result = E::delete_by_id(id).exec(db).await?;
    debug!("Delete on {} affected {} rows", table_name::<E>(), result.rows_affected);
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{author, book, borrow, user};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection, Set, TransactionTrait};

    async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await.unwrap();
        Migrator::up(&db, None).await.expect("Migrations failed.");
        db
    }

    fn new_user(name: &str, email: &str) -> user::ActiveModel {
        user::ActiveModel {
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            ..Default::default()
        }
    }

    fn new_author(name: &str) -> author::ActiveModel {
        author::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
    }

    fn new_book(title: &str, author_id: i32) -> book::ActiveModel {
        book::ActiveModel {
            title: Set(title.to_string()),
            author_id: Set(author_id),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let db = setup_db().await;

        let first = insert(&db, new_author("Ursula K. Le Guin")).await.unwrap();
        let second = insert(&db, new_author("Stanislaw Lem")).await.unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[tokio::test]
    async fn test_get_by_id_missing_returns_none() {
        let db = setup_db().await;

        let found = get_by_id::<user::Entity, _>(&db, 42).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_get_by_id_returns_inserted_record() {
        let db = setup_db().await;
        let id = insert(&db, new_user("Ada", "ada@example.com")).await.unwrap();

        let found = get_by_id::<user::Entity, _>(&db, id).await.unwrap().unwrap();
        assert_eq!(found.name, "Ada");
        assert_eq!(found.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_constraint_violation() {
        let db = setup_db().await;
        insert(&db, new_user("Ada", "ada@example.com")).await.unwrap();

        let err = insert(&db, new_user("Other Ada", "ada@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation(_)));

        let users = list_all::<user::Entity, _>(&db).await.unwrap();
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn test_book_with_unknown_author_is_constraint_violation() {
        let db = setup_db().await;

        let err = insert(&db, new_book("Solaris", 7)).await.unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation(_)));
        assert!(list_all::<book::Entity, _>(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_all_in_insertion_order() {
        let db = setup_db().await;
        for name in ["C", "A", "B"] {
            insert(&db, new_author(name)).await.unwrap();
        }

        let names: Vec<String> = list_all::<author::Entity, _>(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[tokio::test]
    async fn test_filter_by_field() {
        let db = setup_db().await;
        let lem = insert(&db, new_author("Stanislaw Lem")).await.unwrap();
        let le_guin = insert(&db, new_author("Ursula K. Le Guin")).await.unwrap();
        insert(&db, new_book("Solaris", lem)).await.unwrap();
        insert(&db, new_book("The Dispossessed", le_guin)).await.unwrap();
        insert(&db, new_book("The Cyberiad", lem)).await.unwrap();

        let books = filter_by_field::<book::Entity, _, _>(&db, book::Column::AuthorId, lem)
            .await
            .unwrap();
        let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Solaris", "The Cyberiad"]);

        let none = filter_by_field::<book::Entity, _, _>(&db, book::Column::AuthorId, 99)
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_id_reports_whether_row_existed() {
        let db = setup_db().await;
        let id = insert(&db, new_user("Ada", "ada@example.com")).await.unwrap();

        assert!(delete_by_id::<user::Entity, _>(&db, id).await.unwrap());
        assert!(!delete_by_id::<user::Entity, _>(&db, id).await.unwrap());
        assert!(get_by_id::<user::Entity, _>(&db, id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_referenced_user_does_not_cascade() {
        let db = setup_db().await;
        let user_id = insert(&db, new_user("Ada", "ada@example.com")).await.unwrap();
        let author_id = insert(&db, new_author("Lem")).await.unwrap();
        let book_id = insert(&db, new_book("Solaris", author_id)).await.unwrap();
        insert(&db, borrow::ActiveModel::new_now(user_id, book_id))
            .await
            .unwrap();

        let err = delete_by_id::<user::Entity, _>(&db, user_id)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation(_)));

        // Nothing was removed on either side
        assert!(get_by_id::<user::Entity, _>(&db, user_id).await.unwrap().is_some());
        assert_eq!(list_all::<borrow::Entity, _>(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_operations_run_inside_transaction() {
        let db = setup_db().await;
        let author_id = insert(&db, new_author("Lem")).await.unwrap();

        let txn = db.begin().await.unwrap();
        insert(&txn, new_book("Solaris", author_id)).await.unwrap();
        let in_txn = filter_by_field::<book::Entity, _, _>(&txn, book::Column::AuthorId, author_id)
            .await
            .unwrap();
        assert_eq!(in_txn.len(), 1);
        txn.rollback().await.unwrap();

        assert!(list_all::<book::Entity, _>(&db).await.unwrap().is_empty());
    }
}
