//! JSON REST handlers for devices.

use std::str::FromStr;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use devhub_app::ports::DeviceRepository;
use devhub_domain::device::{Device, DeviceState, validate_details};
use devhub_domain::error::ValidationError;
use devhub_domain::id::DeviceId;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a device.
#[derive(Deserialize)]
pub struct CreateDeviceRequest {
    pub id: String,
    pub name: String,
    pub brand: String,
}

/// Request body for `PUT`/`PATCH`. Absent fields are left untouched.
#[derive(Deserialize)]
pub struct UpdateDeviceRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub state: Option<String>,
}

/// Query parameters for the list endpoint. Empty values count as absent.
#[derive(Deserialize)]
pub struct ListQuery {
    pub brand: Option<String>,
    pub state: Option<String>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Device>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get and update endpoints.
pub enum GetResponse {
    Ok(Json<Device>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Device>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// `GET /api/v1/devices?brand=&state=`
///
/// With both filters the brand query runs in the store and the state filter
/// is applied to its result.
pub async fn list<DR>(
    State(state): State<AppState<DR>>,
    Query(params): Query<ListQuery>,
) -> Result<ListResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    let wanted_state = non_empty(params.state)
        .map(|s| DeviceState::from_str(&s))
        .transpose()?;
    let service = &state.device_service;

    let devices = match (non_empty(params.brand), wanted_state) {
        (Some(brand), None) => service.list_devices_by_brand(&brand).await?,
        (Some(brand), Some(wanted)) => service
            .list_devices_by_brand(&brand)
            .await?
            .into_iter()
            .filter(|device| device.state() == wanted)
            .collect(),
        (None, Some(wanted)) => service.list_devices_by_state(wanted).await?,
        (None, None) => service.list_all_devices().await?,
    };
    Ok(ListResponse::Ok(Json(devices)))
}

/// `GET /api/v1/devices/:id`
pub async fn get<DR>(
    State(state): State<AppState<DR>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    let device_id = DeviceId::from_str(&id)?;
    let device = state.device_service.get_device(&device_id).await?;
    Ok(GetResponse::Ok(Json(device)))
}

/// `POST /api/v1/devices`
pub async fn create<DR>(
    State(state): State<AppState<DR>>,
    body: Result<Json<CreateDeviceRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    let Json(req) = body?;
    let device_id = DeviceId::new(req.id)?;
    validate_details(&req.name, &req.brand)?;

    let created = state
        .device_service
        .create_device(device_id, req.name, req.brand)
        .await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT|PATCH /api/v1/devices/:id`
///
/// A state change is applied before a detail change, so a single request can
/// release a device and rename it. The two writes are not atomic: if the
/// detail change fails, the state change stays applied. Without any field the
/// current record is returned unchanged.
pub async fn update<DR>(
    State(state): State<AppState<DR>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateDeviceRequest>, JsonRejection>,
) -> Result<GetResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    let device_id = DeviceId::from_str(&id)?;
    let Json(req) = body?;

    if req.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        return Err(ValidationError::EmptyName.into());
    }
    if req.brand.as_deref().is_some_and(|brand| brand.trim().is_empty()) {
        return Err(ValidationError::EmptyBrand.into());
    }
    let new_state = req.state.as_deref().map(DeviceState::from_str).transpose()?;

    let service = &state.device_service;
    let mut device = None;

    if let Some(new_state) = new_state {
        device = Some(service.update_device_state(&device_id, new_state).await?);
    }

    if req.name.is_some() || req.brand.is_some() {
        let current = match device.take() {
            Some(current) => current,
            None => service.get_device(&device_id).await?,
        };
        let name = req.name.unwrap_or_else(|| current.name().to_owned());
        let brand = req.brand.unwrap_or_else(|| current.brand().to_owned());
        device = Some(service.update_device(&device_id, name, brand).await?);
    }

    let device = match device {
        Some(device) => device,
        None => service.get_device(&device_id).await?,
    };
    Ok(GetResponse::Ok(Json(device)))
}

/// `DELETE /api/v1/devices/:id`
pub async fn delete<DR>(
    State(state): State<AppState<DR>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    let device_id = DeviceId::from_str(&id)?;
    state.device_service.delete_device(&device_id).await?;
    Ok(DeleteResponse::NoContent)
}
