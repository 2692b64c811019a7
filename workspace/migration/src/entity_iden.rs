use model::entities::prelude::*;
use sea_orm::entity::prelude::*;
use sea_orm::Iden;

/// Derives migration identifiers from the entity definitions, so table and
/// column names live in one place.
pub trait EntityIden: EntityTrait {
    /// Get the table identifier for this entity.
    fn table() -> TableIden {
        TableIden(Self::default().table_name().to_string())
    }

    /// Get a column identifier for this entity.
    fn column<C: ColumnTrait + Iden>(column: C) -> ColumnIden {
        let mut s = String::new();
        column.unquoted(&mut s);
        ColumnIden(s)
    }

    /// Name of the foreign key constraint declared on `column` of this entity,
    /// e.g. `fk_books_author_id`.
    fn foreign_key_name<C: ColumnTrait + Iden>(column: C) -> String {
        format!("fk_{}_{}", Self::default().table_name(), Self::column(column).0)
    }

    /// Name of the lookup index on `column` of this entity.
    fn index_name<C: ColumnTrait + Iden>(column: C) -> String {
        format!("idx_{}_{}", Self::default().table_name(), Self::column(column).0)
    }
}

impl EntityIden for User {}
impl EntityIden for Author {}
impl EntityIden for Book {}
impl EntityIden for Borrow {}

/// A wrapper for table identifiers.
#[derive(Debug, Clone)]
pub struct TableIden(String);

impl Iden for TableIden {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        let _ = s.write_str(&self.0);
    }
}

/// A wrapper for column identifiers.
#[derive(Debug, Clone)]
pub struct ColumnIden(String);

impl Iden for ColumnIden {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        let _ = s.write_str(&self.0);
    }
}
