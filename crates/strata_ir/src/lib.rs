//! The hierarchical process IR consumed by the state allocation pass.
//!
//! A [`Design`] holds every [`Net`] (signal identity) and every
//! [`ProcessType`]. Each process type lists its sub-[`Instance`]s with their
//! array-expanded port connections and carries the [`BooleanizedView`]
//! produced by booleanization: the classified variables and the boolean and
//! concurrent port lists.

#![warn(missing_docs)]

pub mod arena;
pub mod builder;
pub mod design;
pub mod ids;
pub mod net;
pub mod process;
pub mod view;

pub use arena::{Arena, ArenaId};
pub use builder::DesignBuilder;
pub use design::Design;
pub use ids::{NetId, ProcessTypeId};
pub use net::Net;
pub use process::{Instance, ProcessType};
pub use view::{BooleanizedView, ClassifiedVar, ConcurrentKind, PortDirection, ViewPort};
