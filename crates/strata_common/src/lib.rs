//! Shared foundational types used across the Strata state-allocation toolchain.
//!
//! This crate provides interned identifiers for net and process names, content
//! hashing for determinism checks, and the common internal-error result type.

#![warn(missing_docs)]

pub mod hash;
pub mod ident;
pub mod result;

pub use hash::ContentHash;
pub use ident::{Ident, Interner};
pub use result::{InternalError, StrataResult};
