pub mod authors;
pub mod books;
pub mod borrows;
pub mod health;
pub mod users;
