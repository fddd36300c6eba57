#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod window;
pub use window::DayWindow;

mod project;
pub use project::project;

/// Strategies for rolling a day series up the hierarchy.
pub mod rollup;

mod aggregate;
pub use aggregate::aggregate;

mod ingest;
pub use ingest::ingest;

/// Running the engine off the request path.
pub mod dispatch;
