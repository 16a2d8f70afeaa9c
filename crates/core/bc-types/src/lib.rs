//! Core types for bucket-census.
//!
//! This crate provides the data model shared by the scanner, its storage
//! and billing adapters, and the CLI:
//! - [`BucketRef`] - A bucket as returned by the account-wide bucket listing
//! - [`ObjectRecord`] - Size and modification time of one stored object
//! - [`BucketSummary`] - Per-bucket usage statistics emitted by a scan
//! - [`CostFigure`] - Storage cost over the trailing month

pub mod bucket;
pub mod cost;

pub use bucket::*;
pub use cost::*;
