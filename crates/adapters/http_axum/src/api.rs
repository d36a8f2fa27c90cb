//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod devices;

use axum::Router;
use axum::routing::get;

use devhub_app::ports::DeviceRepository;

use crate::state::AppState;

/// Build the `/api/v1` sub-router.
pub fn routes<DR>() -> Router<AppState<DR>>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/devices",
            get(devices::list::<DR>).post(devices::create::<DR>),
        )
        .route(
            "/devices/{id}",
            get(devices::get::<DR>)
                .put(devices::update::<DR>)
                .patch(devices::update::<DR>)
                .delete(devices::delete::<DR>),
        )
}
