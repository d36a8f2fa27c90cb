//! # devhub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON REST API** under `/api/v1/devices`
//! - Validate and bind request payloads, rejecting malformed input before it
//!   reaches the application layer
//! - Decide which service operation(s) a request maps to
//! - Map application results and error kinds into HTTP status codes
//!
//! ## Dependency rule
//! Depends on `devhub-app` (for the port trait and service) and `devhub-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
