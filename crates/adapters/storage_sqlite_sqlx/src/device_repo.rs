//! `SQLite` implementation of [`DeviceRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use devhub_app::ports::DeviceRepository;
use devhub_domain::device::{Device, DeviceState};
use devhub_domain::error::{AlreadyExistsError, DevHubError, NotFoundError};
use devhub_domain::id::DeviceId;
use devhub_domain::time::{parse_rfc3339, to_rfc3339};

use crate::error::{StorageError, is_unique_violation};

/// Wrapper for converting database rows into domain [`Device`].
struct Wrapper(Device);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Device> {
        value.map(|w| w.0)
    }

    fn all(values: Vec<Self>) -> Vec<Device> {
        values.into_iter().map(|w| w.0).collect()
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let brand: String = row.try_get("brand")?;
        let state: String = row.try_get("state")?;
        let created_at: String = row.try_get("created_at")?;

        let id = DeviceId::new(id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let state =
            DeviceState::from_str(&state).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let created_at =
            parse_rfc3339(&created_at).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Device::from_parts(id, name, brand, state, created_at)))
    }
}

const INSERT: &str =
    "INSERT INTO devices (id, name, brand, state, created_at) VALUES (?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM devices WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM devices ORDER BY created_at, id";
const SELECT_BY_BRAND: &str = "SELECT * FROM devices WHERE brand = ? ORDER BY created_at, id";
const SELECT_BY_STATE: &str = "SELECT * FROM devices WHERE state = ? ORDER BY created_at, id";
// created_at is written once by INSERT and never updated.
const UPDATE: &str = "UPDATE devices SET name = ?, brand = ?, state = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM devices WHERE id = ?";

/// `SQLite`-backed device repository.
#[derive(Clone)]
pub struct SqliteDeviceRepository {
    pool: SqlitePool,
}

impl SqliteDeviceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DeviceRepository for SqliteDeviceRepository {
    fn save(&self, device: Device) -> impl Future<Output = Result<Device, DevHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(INSERT)
                .bind(device.id().as_str())
                .bind(device.name())
                .bind(device.brand())
                .bind(device.state().as_str())
                .bind(to_rfc3339(&device.created_at()))
                .execute(&pool)
                .await;

            match result {
                Ok(_) => Ok(device),
                Err(err) if is_unique_violation(&err) => Err(AlreadyExistsError {
                    id: device.id().clone(),
                }
                .into()),
                Err(err) => Err(StorageError::from(err).into()),
            }
        }
    }

    fn find_by_id(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, DevHubError>> + Send {
        let pool = self.pool.clone();
        let id = id.to_string();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn find_all(&self) -> impl Future<Output = Result<Vec<Device>, DevHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::all(rows))
        }
    }

    fn find_by_brand(
        &self,
        brand: &str,
    ) -> impl Future<Output = Result<Vec<Device>, DevHubError>> + Send {
        let pool = self.pool.clone();
        let brand = brand.to_owned();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_BRAND)
                .bind(brand)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::all(rows))
        }
    }

    fn find_by_state(
        &self,
        state: DeviceState,
    ) -> impl Future<Output = Result<Vec<Device>, DevHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_STATE)
                .bind(state.as_str())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::all(rows))
        }
    }

    fn update(&self, device: Device) -> impl Future<Output = Result<Device, DevHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(UPDATE)
                .bind(device.name())
                .bind(device.brand())
                .bind(device.state().as_str())
                .bind(device.id().as_str())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(NotFoundError {
                    id: device.id().clone(),
                }
                .into());
            }
            Ok(device)
        }
    }

    fn delete(&self, id: &DeviceId) -> impl Future<Output = Result<(), DevHubError>> + Send {
        let pool = self.pool.clone();
        let id = id.clone();
        async move {
            let result = sqlx::query(DELETE_BY_ID)
                .bind(id.as_str())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(NotFoundError { id }.into());
            }
            Ok(())
        }
    }
}
