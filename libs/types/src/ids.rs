//! Unique identifier types for register records
//!
//! All IDs wrap UUID v7 so they sort by creation time and can be carried
//! through JSON snapshots unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! register_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new id with the current timestamp
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Create from existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get inner UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

register_id!(
    /// Identifier for an organizational asset
    AssetId
);

register_id!(
    /// Identifier for a threat catalog entry
    ThreatId
);

register_id!(
    /// Identifier for a vulnerability catalog entry
    VulnerabilityId
);

register_id!(
    /// Identifier for a candidate control
    ControlId
);

register_id!(
    /// Identifier for a risk scenario (asset × threat × vulnerability)
    ScenarioId
);

register_id!(
    /// Identifier for a recorded incident
    IncidentId
);
