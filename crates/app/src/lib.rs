//! # devhub-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **port trait** adapters must implement (driven/outbound port):
//!   - `DeviceRepository` — persistence for devices
//! - Define the **driving/inbound port** as a use-case struct:
//!   - `DeviceService` — create, get, list, update details, update state, delete
//! - Provide an **in-process store** (`memory`) that needs no IO
//! - Orchestrate domain objects without knowing *how* persistence works
//!
//! ## Dependency rule
//! Depends on `devhub-domain` only (plus `tokio::sync` for the in-process store).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod memory;
pub mod ports;
pub mod services;
