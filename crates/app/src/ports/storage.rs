//! Storage port — repository trait for device persistence.

use std::future::Future;

use devhub_domain::device::{Device, DeviceState};
use devhub_domain::error::DevHubError;
use devhub_domain::id::DeviceId;

/// Persistence capability consumed by [`DeviceService`](crate::services::device_service::DeviceService).
///
/// Implementations own the authoritative uniqueness guard on device ids and
/// must report a duplicate insert as [`DevHubError::AlreadyExists`], never as
/// a storage fault. List methods return matches in an order of the
/// implementation's choosing; an empty result is not an error.
pub trait DeviceRepository {
    /// Insert a new device.
    ///
    /// Fails with [`DevHubError::AlreadyExists`] when the id is taken.
    fn save(&self, device: Device) -> impl Future<Output = Result<Device, DevHubError>> + Send;

    /// Fetch a device, `None` when absent.
    fn find_by_id(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, DevHubError>> + Send;

    fn find_all(&self) -> impl Future<Output = Result<Vec<Device>, DevHubError>> + Send;

    fn find_by_brand(
        &self,
        brand: &str,
    ) -> impl Future<Output = Result<Vec<Device>, DevHubError>> + Send;

    fn find_by_state(
        &self,
        state: DeviceState,
    ) -> impl Future<Output = Result<Vec<Device>, DevHubError>> + Send;

    /// Overwrite the stored record with the same id (last write wins).
    ///
    /// Fails with [`DevHubError::NotFound`] when the record no longer exists.
    fn update(&self, device: Device) -> impl Future<Output = Result<Device, DevHubError>> + Send;

    /// Remove a device.
    ///
    /// Fails with [`DevHubError::NotFound`] when nothing was removed.
    fn delete(&self, id: &DeviceId) -> impl Future<Output = Result<(), DevHubError>> + Send;
}
