//! Persistence layer of the library service: SeaORM entities and the
//! generic data-access operations the HTTP handlers are built on.

pub mod entities;
pub mod store;
