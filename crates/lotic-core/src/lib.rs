//! # lotic-core
//!
//! Core primitives for the lotic pipeline state platform.
//!
//! This crate provides the foundational types used across all lotic
//! components:
//!
//! - **Interval Engine**: Lot bucketing, canonical lot ids
//! - **Label Algebra**: Deterministic naming from ordered parts
//! - **Partition Algebra**: Hierarchical object-key construction
//! - **Export Refs**: Colon-delimited identifiers for stack-exported values
//! - **Storage Traits**: The object-store contract state tracking rides on
//! - **Retry**: Bounded exponential backoff for outbound calls
//! - **Error Types**: Shared error definitions and result types
//!
//! ## Crate Boundary
//!
//! `lotic-core` is the only crate allowed to define shared primitives. The
//! model and state crates build on these contracts and never reach around
//! them.
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use lotic_core::prelude::*;
//!
//! let builder = IntervalBuilder::new(IntervalUnit::Fourths);
//! let lot = builder.truncate_and_format(Utc::now());
//! assert_eq!(lot.len(), 16);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod interval;
pub mod label;
pub mod observability;
pub mod partition;
pub mod refs;
pub mod retry;
pub mod storage;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use lotic_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::interval::{IntervalBuilder, IntervalUnit};
    pub use crate::label::Label;
    pub use crate::partition::Partition;
    pub use crate::refs::{Qualifier, Ref};
    pub use crate::retry::RetryPolicy;
    pub use crate::storage::{
        MemoryBackend, ObjectMeta, StorageBackend, WritePrecondition, WriteResult,
    };
}

pub use error::{Error, Result};
pub use interval::{IntervalBuilder, IntervalUnit};
pub use label::Label;
pub use partition::Partition;
pub use storage::{MemoryBackend, ObjectMeta, StorageBackend, WritePrecondition, WriteResult};
