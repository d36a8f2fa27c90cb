//! Common error types used across the workspace.
//!
//! Every layer defines its own typed errors and converts them into
//! [`DevHubError`] via `From`. The variant tells the boundary layer which
//! outcome occurred; it never needs to inspect the message.

use crate::id::DeviceId;

/// Top-level error for every device operation.
#[derive(Debug, thiserror::Error)]
pub enum DevHubError {
    /// Input rejected before reaching the domain.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No device exists with the requested id.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// A device with the requested id already exists.
    #[error(transparent)]
    AlreadyExists(#[from] AlreadyExistsError),

    /// The mutation conflicts with the device being in use.
    #[error(transparent)]
    InUse(#[from] InUseError),

    /// The persistence layer failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Invalid input at the system boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("device id must not be empty")]
    EmptyId,

    #[error("device name must not be empty")]
    EmptyName,

    #[error("device brand must not be empty")]
    EmptyBrand,

    #[error("invalid device state `{0}` (expected available, in-use or inactive)")]
    InvalidState(String),

    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("device `{id}` not found")]
pub struct NotFoundError {
    pub id: DeviceId,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("device `{id}` already exists")]
pub struct AlreadyExistsError {
    pub id: DeviceId,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("device `{id}` is in use")]
pub struct InUseError {
    pub id: DeviceId,
}
