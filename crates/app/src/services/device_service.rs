//! Device service — use-cases for managing devices.
//!
//! Every operation is a short fetch/modify/persist sequence against the
//! repository with no lock held across it. Concurrent mutations of the same
//! device are last-write-wins; the repository's uniqueness guard is the
//! authority on duplicate ids, the existence check in
//! [`DeviceService::create_device`] only short-circuits the common case.

use devhub_domain::device::{Device, DeviceState};
use devhub_domain::error::{AlreadyExistsError, DevHubError, NotFoundError};
use devhub_domain::id::DeviceId;

use crate::ports::DeviceRepository;

/// Application service for the device lifecycle.
pub struct DeviceService<R> {
    repo: R,
}

impl<R: DeviceRepository> DeviceService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Register a new device in the `available` state.
    ///
    /// # Errors
    ///
    /// Returns [`DevHubError::AlreadyExists`] when a device with `id` exists,
    /// whether detected up front or by the repository at write time, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip_all, fields(device_id = %id))]
    pub async fn create_device(
        &self,
        id: DeviceId,
        name: String,
        brand: String,
    ) -> Result<Device, DevHubError> {
        if self.repo.find_by_id(&id).await?.is_some() {
            tracing::warn!("device id already taken");
            return Err(AlreadyExistsError { id }.into());
        }

        let device = self.repo.save(Device::new(id, name, brand)).await?;
        tracing::info!(brand = device.brand(), "device created");
        Ok(device)
    }

    /// Look up a device by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DevHubError::NotFound`] when no device with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip_all, fields(device_id = %id))]
    pub async fn get_device(&self, id: &DeviceId) -> Result<Device, DevHubError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| NotFoundError { id: id.clone() }.into())
    }

    /// List all devices.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_all_devices(&self) -> Result<Vec<Device>, DevHubError> {
        self.repo.find_all().await
    }

    /// List the devices of one brand.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_devices_by_brand(&self, brand: &str) -> Result<Vec<Device>, DevHubError> {
        self.repo.find_by_brand(brand).await
    }

    /// List the devices currently in `state`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_devices_by_state(
        &self,
        state: DeviceState,
    ) -> Result<Vec<Device>, DevHubError> {
        self.repo.find_by_state(state).await
    }

    /// Replace the name and brand of a device.
    ///
    /// # Errors
    ///
    /// Returns [`DevHubError::NotFound`] if the device does not exist,
    /// [`DevHubError::InUse`] if it is in use and the details differ (nothing
    /// is persisted), or a storage error from the repository.
    #[tracing::instrument(skip_all, fields(device_id = %id))]
    pub async fn update_device(
        &self,
        id: &DeviceId,
        name: String,
        brand: String,
    ) -> Result<Device, DevHubError> {
        let mut device = self.get_device(id).await?;
        if let Err(err) = device.update_details(name, brand) {
            tracing::warn!("details are frozen while the device is in use");
            return Err(err);
        }
        let device = self.repo.update(device).await?;
        tracing::debug!("device details updated");
        Ok(device)
    }

    /// Move a device to another state.
    ///
    /// # Errors
    ///
    /// Returns [`DevHubError::NotFound`] if the device does not exist,
    /// or a storage error from the repository.
    #[tracing::instrument(skip_all, fields(device_id = %id, state = %state))]
    pub async fn update_device_state(
        &self,
        id: &DeviceId,
        state: DeviceState,
    ) -> Result<Device, DevHubError> {
        let mut device = self.get_device(id).await?;
        device.update_state(state);
        let device = self.repo.update(device).await?;
        tracing::debug!("device state updated");
        Ok(device)
    }

    /// Delete a device by id.
    ///
    /// # Errors
    ///
    /// Returns [`DevHubError::NotFound`] if the device does not exist (or
    /// vanished before the delete ran), [`DevHubError::InUse`] if it is in
    /// use, or a storage error from the repository.
    #[tracing::instrument(skip_all, fields(device_id = %id))]
    pub async fn delete_device(&self, id: &DeviceId) -> Result<(), DevHubError> {
        let device = self.get_device(id).await?;
        if let Err(err) = device.can_be_deleted() {
            tracing::warn!("refusing to delete a device in use");
            return Err(err);
        }
        self.repo.delete(id).await?;
        tracing::info!("device deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryDeviceRepository;

    fn make_service() -> DeviceService<InMemoryDeviceRepository> {
        DeviceService::new(InMemoryDeviceRepository::new())
    }

    fn id(value: &str) -> DeviceId {
        DeviceId::new(value).unwrap()
    }

    async fn create(svc: &DeviceService<InMemoryDeviceRepository>, value: &str, brand: &str) {
        svc.create_device(id(value), "Phone".into(), brand.into())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn should_create_device_in_available_state() {
        let svc = make_service();
        let created = svc
            .create_device(id("d1"), "Phone".into(), "Acme".into())
            .await
            .unwrap();
        assert_eq!(created.state(), DeviceState::Available);

        let fetched = svc.get_device(&id("d1")).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn should_reject_duplicate_id_without_touching_existing_record() {
        let svc = make_service();
        let original = svc
            .create_device(id("d1"), "Phone".into(), "Acme".into())
            .await
            .unwrap();

        let result = svc
            .create_device(id("d1"), "Tablet".into(), "Globex".into())
            .await;
        assert!(matches!(result, Err(DevHubError::AlreadyExists(ref e)) if e.id == id("d1")));

        let kept = svc.get_device(&id("d1")).await.unwrap();
        assert_eq!(kept, original);
    }

    #[tokio::test]
    async fn should_report_not_found_for_every_operation_on_missing_id() {
        let svc = make_service();
        let ghost = id("ghost");

        assert!(matches!(
            svc.get_device(&ghost).await,
            Err(DevHubError::NotFound(_))
        ));
        assert!(matches!(
            svc.update_device(&ghost, "a".into(), "b".into()).await,
            Err(DevHubError::NotFound(_))
        ));
        assert!(matches!(
            svc.update_device_state(&ghost, DeviceState::Inactive).await,
            Err(DevHubError::NotFound(_))
        ));
        assert!(matches!(
            svc.delete_device(&ghost).await,
            Err(DevHubError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn should_freeze_details_while_in_use() {
        let svc = make_service();
        create(&svc, "d1", "Acme").await;
        svc.update_device_state(&id("d1"), DeviceState::InUse)
            .await
            .unwrap();

        let result = svc
            .update_device(&id("d1"), "Phone2".into(), "Acme".into())
            .await;
        assert!(matches!(result, Err(DevHubError::InUse(_))));

        let stored = svc.get_device(&id("d1")).await.unwrap();
        assert_eq!(stored.name(), "Phone");
        assert_eq!(stored.brand(), "Acme");

        let same = svc
            .update_device(&id("d1"), "Phone".into(), "Acme".into())
            .await
            .unwrap();
        assert_eq!(same.name(), "Phone");
    }

    #[tokio::test]
    async fn should_refuse_delete_while_in_use() {
        let svc = make_service();
        create(&svc, "d1", "Acme").await;
        svc.update_device_state(&id("d1"), DeviceState::InUse)
            .await
            .unwrap();

        let result = svc.delete_device(&id("d1")).await;
        assert!(matches!(result, Err(DevHubError::InUse(_))));
        assert!(svc.get_device(&id("d1")).await.is_ok());
    }

    #[tokio::test]
    async fn should_keep_created_at_through_updates() {
        let svc = make_service();
        let created = svc
            .create_device(id("d1"), "Phone".into(), "Acme".into())
            .await
            .unwrap();

        svc.update_device(&id("d1"), "Phone2".into(), "Globex".into())
            .await
            .unwrap();
        svc.update_device_state(&id("d1"), DeviceState::InUse)
            .await
            .unwrap();
        svc.update_device_state(&id("d1"), DeviceState::Inactive)
            .await
            .unwrap();

        let stored = svc.get_device(&id("d1")).await.unwrap();
        assert_eq!(stored.created_at(), created.created_at());
        assert_eq!(stored.id(), created.id());
    }

    #[tokio::test]
    async fn should_run_full_lifecycle() {
        let svc = make_service();
        let d1 = id("d1");

        let created = svc
            .create_device(d1.clone(), "Phone".into(), "Acme".into())
            .await
            .unwrap();
        assert_eq!(created.state(), DeviceState::Available);

        svc.update_device_state(&d1, DeviceState::InUse)
            .await
            .unwrap();
        assert!(matches!(
            svc.update_device(&d1, "Phone2".into(), "Acme".into()).await,
            Err(DevHubError::InUse(_))
        ));
        assert!(matches!(
            svc.delete_device(&d1).await,
            Err(DevHubError::InUse(_))
        ));

        svc.update_device_state(&d1, DeviceState::Available)
            .await
            .unwrap();
        let renamed = svc
            .update_device(&d1, "Phone2".into(), "Acme".into())
            .await
            .unwrap();
        assert_eq!(renamed.name(), "Phone2");

        svc.delete_device(&d1).await.unwrap();
        assert!(matches!(
            svc.get_device(&d1).await,
            Err(DevHubError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn should_filter_by_brand_and_state() {
        let svc = make_service();
        create(&svc, "d1", "A").await;
        create(&svc, "d2", "B").await;
        create(&svc, "d3", "A").await;

        let brand_a = svc.list_devices_by_brand("A").await.unwrap();
        let mut ids: Vec<&str> = brand_a.iter().map(|d| d.id().as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, ["d1", "d3"]);

        let available = svc
            .list_devices_by_state(DeviceState::Available)
            .await
            .unwrap();
        assert_eq!(available.len(), 3);

        assert_eq!(svc.list_all_devices().await.unwrap().len(), 3);
        assert!(svc.list_devices_by_brand("C").await.unwrap().is_empty());
    }

    /// Repository whose lookups never see the record a concurrent writer
    /// already inserted, so only the write-time guard can catch duplicates.
    struct RacingRepo;

    impl DeviceRepository for RacingRepo {
        async fn save(&self, device: Device) -> Result<Device, DevHubError> {
            Err(AlreadyExistsError {
                id: device.id().clone(),
            }
            .into())
        }
        async fn find_by_id(&self, _id: &DeviceId) -> Result<Option<Device>, DevHubError> {
            Ok(None)
        }
        async fn find_all(&self) -> Result<Vec<Device>, DevHubError> {
            Ok(vec![])
        }
        async fn find_by_brand(&self, _brand: &str) -> Result<Vec<Device>, DevHubError> {
            Ok(vec![])
        }
        async fn find_by_state(&self, _state: DeviceState) -> Result<Vec<Device>, DevHubError> {
            Ok(vec![])
        }
        async fn update(&self, device: Device) -> Result<Device, DevHubError> {
            Ok(device)
        }
        async fn delete(&self, _id: &DeviceId) -> Result<(), DevHubError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn should_report_already_exists_when_store_detects_duplicate() {
        let svc = DeviceService::new(RacingRepo);
        let result = svc
            .create_device(id("d1"), "Phone".into(), "Acme".into())
            .await;
        assert!(matches!(result, Err(DevHubError::AlreadyExists(_))));
    }

    /// Repository that holds one device and fails every write.
    struct BrokenRepo(Device);

    fn disk_error() -> DevHubError {
        DevHubError::Storage(Box::new(std::io::Error::other("disk full")))
    }

    impl DeviceRepository for BrokenRepo {
        async fn save(&self, _device: Device) -> Result<Device, DevHubError> {
            Err(disk_error())
        }
        async fn find_by_id(&self, _id: &DeviceId) -> Result<Option<Device>, DevHubError> {
            Ok(Some(self.0.clone()))
        }
        async fn find_all(&self) -> Result<Vec<Device>, DevHubError> {
            Err(disk_error())
        }
        async fn find_by_brand(&self, _brand: &str) -> Result<Vec<Device>, DevHubError> {
            Err(disk_error())
        }
        async fn find_by_state(&self, _state: DeviceState) -> Result<Vec<Device>, DevHubError> {
            Err(disk_error())
        }
        async fn update(&self, _device: Device) -> Result<Device, DevHubError> {
            Err(disk_error())
        }
        async fn delete(&self, _id: &DeviceId) -> Result<(), DevHubError> {
            Err(disk_error())
        }
    }

    #[tokio::test]
    async fn should_propagate_storage_failures_unchanged() {
        let svc = DeviceService::new(BrokenRepo(Device::new(id("d1"), "Phone", "Acme")));

        assert!(matches!(
            svc.update_device(&id("d1"), "Phone2".into(), "Acme".into())
                .await,
            Err(DevHubError::Storage(_))
        ));
        assert!(matches!(
            svc.update_device_state(&id("d1"), DeviceState::Inactive)
                .await,
            Err(DevHubError::Storage(_))
        ));
        assert!(matches!(
            svc.delete_device(&id("d1")).await,
            Err(DevHubError::Storage(_))
        ));
        assert!(matches!(
            svc.list_all_devices().await,
            Err(DevHubError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn should_not_persist_rejected_update() {
        let mut busy = Device::new(id("d1"), "Phone", "Acme");
        busy.update_state(DeviceState::InUse);
        let svc = DeviceService::new(BrokenRepo(busy));

        // The in-use guard fires before the failing write is attempted.
        assert!(matches!(
            svc.update_device(&id("d1"), "Phone2".into(), "Acme".into())
                .await,
            Err(DevHubError::InUse(_))
        ));
        assert!(matches!(
            svc.delete_device(&id("d1")).await,
            Err(DevHubError::InUse(_))
        ));
    }
}
