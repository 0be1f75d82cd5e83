//! Opaque ID newtypes for IR entities.
//!
//! A [`NetId`] is the identity of a signal: two references to the same wire
//! carry the same ID, and equality is by ID only. Maps keyed by `NetId` are
//! lookups, never ownership.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// Opaque, copyable identity of a net anywhere in the design.
    NetId
);

define_id!(
    /// Opaque, copyable ID of a process type.
    ProcessTypeId
);
