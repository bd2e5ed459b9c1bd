//! Shared row types for all database backends
//!
//! Entities map one-to-one onto the library metadata tables. Every type
//! decodes from both SQLite and PostgreSQL rows so one dispatcher can serve
//! either backend.

mod library;

pub use library::{
    Author, Book, BookData, Comment, Identifier, Language, Publisher, Rating, Series, Tag,
};
