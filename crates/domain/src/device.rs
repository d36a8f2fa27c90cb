//! The managed device record and its single-record invariants.
//!
//! Identity and creation time are fixed at construction: the fields are
//! private and only exposed through getters. Name and brand can change only
//! while the device is not in use, and an in-use device cannot be deleted.

mod state;

pub use state::DeviceState;

use serde::{Deserialize, Serialize};

use crate::error::{DevHubError, InUseError, ValidationError};
use crate::id::DeviceId;
use crate::time::{Timestamp, now};

/// A device tracked by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    id: DeviceId,
    name: String,
    brand: String,
    state: DeviceState,
    created_at: Timestamp,
}

impl Device {
    /// Construct a new device in the [`DeviceState::Available`] state,
    /// created now.
    ///
    /// Does not validate `name` or `brand`; callers are expected to run
    /// [`validate_details`] at the boundary.
    #[must_use]
    pub fn new(id: DeviceId, name: impl Into<String>, brand: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            brand: brand.into(),
            state: DeviceState::Available,
            created_at: now(),
        }
    }

    /// Rebuild a device from previously persisted fields.
    #[must_use]
    pub fn from_parts(
        id: DeviceId,
        name: String,
        brand: String,
        state: DeviceState,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            brand,
            state,
            created_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn brand(&self) -> &str {
        &self.brand
    }

    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.state
    }

    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Replace name and brand.
    ///
    /// Setting the current values again is always allowed, even while in use.
    ///
    /// # Errors
    ///
    /// Returns [`DevHubError::InUse`] when the device is in use and either
    /// value differs from the current one. Nothing is modified in that case.
    pub fn update_details(
        &mut self,
        name: impl Into<String>,
        brand: impl Into<String>,
    ) -> Result<(), DevHubError> {
        let name = name.into();
        let brand = brand.into();
        if self.state.is_in_use() && (name != self.name || brand != self.brand) {
            return Err(InUseError {
                id: self.id.clone(),
            }
            .into());
        }
        self.name = name;
        self.brand = brand;
        Ok(())
    }

    /// Move the device to `state`. Every transition is allowed.
    pub fn update_state(&mut self, state: DeviceState) {
        self.state = state;
    }

    /// Check whether the device may be removed.
    ///
    /// # Errors
    ///
    /// Returns [`DevHubError::InUse`] when the device is in use.
    pub fn can_be_deleted(&self) -> Result<(), DevHubError> {
        if self.state.is_in_use() {
            return Err(InUseError {
                id: self.id.clone(),
            }
            .into());
        }
        Ok(())
    }
}

/// Check the human-supplied labels of a device.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyName`] or [`ValidationError::EmptyBrand`]
/// when the corresponding value is empty or only whitespace.
pub fn validate_details(name: &str, brand: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if brand.trim().is_empty() {
        return Err(ValidationError::EmptyBrand);
    }
    Ok(())
}
