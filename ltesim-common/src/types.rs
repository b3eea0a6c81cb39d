//! Core identifier types: logical channel and component carrier IDs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of component carriers a UE can be configured with.
pub const MAX_COMPONENT_CARRIERS: usize = 5;

/// Logical Channel Identity (LCID).
///
/// Assigned by RRC when a bearer is established and unique within the UE's
/// active logical channel set. Released together with the bearer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LogicalChannelId(pub u8);

impl LogicalChannelId {
    /// Creates a new logical channel ID.
    pub const fn new(lcid: u8) -> Self {
        Self(lcid)
    }

    /// Returns the raw LCID value.
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for LogicalChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LCID-{}", self.0)
    }
}

impl From<u8> for LogicalChannelId {
    fn from(lcid: u8) -> Self {
        Self(lcid)
    }
}

impl From<LogicalChannelId> for u8 {
    fn from(lcid: LogicalChannelId) -> u8 {
        lcid.0
    }
}

/// Component Carrier ID.
///
/// Names one of the UE's configured carriers. ID 0 is the primary carrier
/// (PCell), every other ID is a secondary carrier (SCell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct ComponentCarrierId(pub u8);

impl ComponentCarrierId {
    /// The primary component carrier.
    pub const PRIMARY: ComponentCarrierId = ComponentCarrierId(0);

    /// Creates a new component carrier ID.
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Returns the raw carrier ID value.
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns true if this is the primary carrier.
    pub fn is_primary(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if this is a secondary carrier.
    pub fn is_secondary(&self) -> bool {
        !self.is_primary()
    }
}

impl fmt::Display for ComponentCarrierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_primary() {
            write!(f, "CC-{}(P)", self.0)
        } else {
            write!(f, "CC-{}(S)", self.0)
        }
    }
}

impl From<u8> for ComponentCarrierId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

impl From<ComponentCarrierId> for u8 {
    fn from(id: ComponentCarrierId) -> u8 {
        id.0
    }
}
