//! Collection aliases used across Strata.
//!
//! Hash maps and sets use AHash; keys in this engine are small integer ids
//! that never come from untrusted input.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
