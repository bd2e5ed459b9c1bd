//! Bookshelf server
//!
//! Serves whitelisted, paginated searches over a calibre-style library
//! metadata database (SQLite or PostgreSQL).

pub mod api;
pub mod app;
pub mod core;
pub mod data;
