//! Domain rules for the Arcana catalog.
//!
//! This crate has no internal dependencies and no I/O. It holds the pieces of
//! the content-mapping integrity engine that can be expressed as pure
//! functions: the talk lifecycle state machine, mapping field validation,
//! the validation-sweep severity table, search scoring, and the audit sink
//! contract.

pub mod audit;
pub mod catalog;
pub mod error;
pub mod lifecycle;
pub mod mapping;
pub mod naming;
pub mod search;
pub mod social;
pub mod sweep;
pub mod types;
