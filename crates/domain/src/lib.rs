//! # devhub-domain
//!
//! Pure domain model for the devhub device registry.
//!
//! ## Responsibilities
//! - Foundational types: the client-supplied device identifier, error
//!   conventions, timestamps
//! - Define the **Device** entity and its [`DeviceState`](device::DeviceState)
//!   state machine
//! - Enforce every invariant local to a single device record: immutable
//!   identity and creation time, the in-use guard on detail changes and deletion
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod device;
