//! Nets: the design-wide signal identities.

use crate::ids::NetId;
use strata_common::Ident;
use serde::{Deserialize, Serialize};

/// A named net.
///
/// Global nets (supplies, resets shared by the whole design) are visible in
/// every process but never receive local state and are never checked for
/// multiple drivers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Net {
    /// The identity of this net.
    pub id: NetId,
    /// Display name, used in diagnostics.
    pub name: Ident,
    /// Whether the net is shared across the whole design.
    pub global: bool,
}
