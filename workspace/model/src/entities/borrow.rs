use sea_orm::entity::prelude::*;
use sea_orm::Set;

/// Records that a user borrowed a book at a point in time.
///
/// There is no return workflow: a borrow row is only ever inserted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "borrows")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    /// Time of insertion (UTC).
    pub borrow_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookId",
        to = "super::book::Column::Id"
    )]
    Book,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// Builds a borrow stamped with the current time.
    pub fn new_now(user_id: i32, book_id: i32) -> Self {
        Self {
            user_id: Set(user_id),
            book_id: Set(book_id),
            borrow_date: Set(chrono::Utc::now()),
            ..Default::default()
        }
    }
}
