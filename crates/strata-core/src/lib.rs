//! Strata Core
//!
//! This crate contains the shared utilities for the Strata renderer: logging
//! bootstrap, profiling hooks, geometry primitives and math re-exports.

pub mod alloc;
pub mod config;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;

pub use config::{BenchmarkMode, Config};
