//! Core traits for bucket-census.
//!
//! This crate defines the external capabilities the scanner depends on:
//! - [`StorageApi`] - Bucket listing, object listing and lifecycle queries
//! - [`CostApi`] - Per-day, per-service cost queries

pub mod cost;
pub mod storage;

pub use cost::*;
pub use storage::*;
