//! Shared application state for axum handlers.

use std::sync::Arc;

use devhub_app::ports::DeviceRepository;
use devhub_app::services::device_service::DeviceService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository type to avoid dynamic dispatch.
/// `Clone` is implemented manually so the repository itself does not need to
/// be `Clone`; only the `Arc` wrapper is cloned.
pub struct AppState<DR> {
    /// Device lifecycle service.
    pub device_service: Arc<DeviceService<DR>>,
}

impl<DR> Clone for AppState<DR> {
    fn clone(&self) -> Self {
        Self {
            device_service: Arc::clone(&self.device_service),
        }
    }
}

impl<DR> AppState<DR>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    /// Create a new application state from a service instance.
    pub fn new(device_service: DeviceService<DR>) -> Self {
        Self::from_arc(Arc::new(device_service))
    }

    /// Create a new application state from a pre-wrapped `Arc` service.
    ///
    /// Use this when the service is also shared outside the HTTP layer.
    pub fn from_arc(device_service: Arc<DeviceService<DR>>) -> Self {
        Self { device_service }
    }
}
