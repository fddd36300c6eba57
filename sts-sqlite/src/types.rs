//! Column types shared by the queries of this crate.

mod datetime;
pub use datetime::DateTime;
