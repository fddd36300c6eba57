#![warn(missing_docs)]
// Note: this overwrites the link in the README to point to the rust docs of the sts-core crate.
//! [sts_core]: https://docs.rs/sts_core/latest/sts_core/index.html
//! [sts_engine]: https://docs.rs/sts_engine/latest/sts_engine/index.html
#![doc = include_str!("../README.md")]

/// Core domain models for the stats tree.
///
/// This module contains the fundamental data structures: the metric and level
/// enumerations, hierarchy node ids, the raw product records that feed an
/// aggregation, and the nodes of the resulting tree.
///
/// The models in this module are primarily data structures with minimal
/// business logic, keeping the domain entities separate from the engine that
/// builds them and the adapters that persist or serve them.
pub mod models;

/// Interface traits for the stats tree.
///
/// This module contains the "ports" in the hexagonal architecture pattern.
///
/// These traits define the contract between the aggregation engine and its
/// external collaborators (the product feed and the tree cache) without
/// specifying implementation details.
pub mod ports;
