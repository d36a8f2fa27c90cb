//! Device state: the operational status that gates mutation and deletion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Operational state of a device.
///
/// Transitions between the variants are unrestricted. While a device is
/// [`InUse`](Self::InUse) its name and brand are frozen and it cannot be
/// deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceState {
    #[default]
    Available,
    InUse,
    Inactive,
}

impl DeviceState {
    /// Every recognized state, in declaration order.
    pub const ALL: [Self; 3] = [Self::Available, Self::InUse, Self::Inactive];

    /// Wire representation (`available`, `in-use`, `inactive`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::InUse => "in-use",
            Self::Inactive => "inactive",
        }
    }

    #[must_use]
    pub fn is_in_use(self) -> bool {
        matches!(self, Self::InUse)
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidState(s.to_owned()))
    }
}
