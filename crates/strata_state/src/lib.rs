//! State allocation and multi-driver detection over the process hierarchy.
//!
//! For every process type the pass numbers the signals the process owns,
//! separately for the boolean view and the concurrent view, records where
//! each port sits relative to the instantiating parent, sums the state of all
//! sub-instances, and flags signals with more than one driver. Each type is
//! computed once; instances of the same type share its [`StateInfo`].
//!
//! # Usage
//!
//! ```ignore
//! let mut pass = StatePass::new(config.state);
//! pass.run(&design, design.top, &interner, &sink)?;
//! let info = pass.state_info(design.top).unwrap();
//! ```

#![warn(missing_docs)]

mod aggregate;
mod alloc;
mod drivers;
pub mod errors;
mod finalize;
pub mod info;
pub mod pass;
pub mod query;
mod undriven;
mod universe;

pub use errors::StateError;
pub use info::{
    ConcurrentCounts, ConcurrentIndex, ConcurrentOffset, StateCategory, StateInfo, StateSlot,
    SubinstanceFlags,
};
pub use pass::{StatePass, Summary};
pub use query::hierarchy_order;
