use sea_orm::entity::prelude::*;

/// A library member who can borrow books.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Unique across all users; enforced by the storage layer.
    #[sea_orm(unique)]
    pub email: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // Lookup only, deleting a user never touches its borrows.
    #[sea_orm(has_many = "super::borrow::Entity")]
    Borrow,
}

impl Related<super::borrow::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Borrow.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
