//! Data models for Bookshelf

pub mod author;
pub mod book;
pub mod isbn;

// Re-export commonly used types
pub use author::{Author, AuthorForm, NewAuthor};
pub use book::{Book, BookForm, BookOrder, BookView, BookWithAuthor, DeletedBook, NewBook};
pub use isbn::Isbn;
