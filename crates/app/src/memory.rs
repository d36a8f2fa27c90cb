//! In-process [`DeviceRepository`] backed by a map behind an async lock.
//!
//! Used for tests and for running the service without a database. Each
//! operation takes the lock once, so the duplicate check in `save` and the
//! existence check in `update`/`delete` are atomic with their write.

use std::collections::BTreeMap;

use tokio::sync::RwLock;

use devhub_domain::device::{Device, DeviceState};
use devhub_domain::error::{AlreadyExistsError, DevHubError, NotFoundError};
use devhub_domain::id::DeviceId;

use crate::ports::DeviceRepository;

/// Devices kept in memory, listed in id order.
#[derive(Debug, Default)]
pub struct InMemoryDeviceRepository {
    devices: RwLock<BTreeMap<DeviceId, Device>>,
}

impl InMemoryDeviceRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn filter(&self, predicate: impl Fn(&Device) -> bool) -> Vec<Device> {
        self.devices
            .read()
            .await
            .values()
            .filter(|device| predicate(device))
            .cloned()
            .collect()
    }
}

impl DeviceRepository for InMemoryDeviceRepository {
    async fn save(&self, device: Device) -> Result<Device, DevHubError> {
        let mut devices = self.devices.write().await;
        if devices.contains_key(device.id()) {
            return Err(AlreadyExistsError {
                id: device.id().clone(),
            }
            .into());
        }
        devices.insert(device.id().clone(), device.clone());
        Ok(device)
    }

    async fn find_by_id(&self, id: &DeviceId) -> Result<Option<Device>, DevHubError> {
        Ok(self.devices.read().await.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Device>, DevHubError> {
        Ok(self.filter(|_| true).await)
    }

    async fn find_by_brand(&self, brand: &str) -> Result<Vec<Device>, DevHubError> {
        Ok(self.filter(|device| device.brand() == brand).await)
    }

    async fn find_by_state(&self, state: DeviceState) -> Result<Vec<Device>, DevHubError> {
        Ok(self.filter(|device| device.state() == state).await)
    }

    async fn update(&self, device: Device) -> Result<Device, DevHubError> {
        let mut devices = self.devices.write().await;
        match devices.get_mut(device.id()) {
            Some(slot) => {
                *slot = device.clone();
                Ok(device)
            }
            None => Err(NotFoundError {
                id: device.id().clone(),
            }
            .into()),
        }
    }

    async fn delete(&self, id: &DeviceId) -> Result<(), DevHubError> {
        match self.devices.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(NotFoundError { id: id.clone() }.into()),
        }
    }
}
