//! Port implementations for the SQLite database.

mod cache;
