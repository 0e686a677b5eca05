//! Book catalogue module.

mod book;
mod query;

pub use book::Book;
pub use query::BookQuery;
