//! REST client module for the user directory endpoint.
//!
//! This module provides the `UserClient` for fetching the user list and
//! probing connectivity, the `UserSource` seam the orchestrator depends on,
//! and the typed `FetchError` taxonomy with its user-facing messages.

pub mod client;
pub mod error;

pub use client::{decode_users, ConnectionStatus, UserClient, UserSource, DEFAULT_API_URL};
pub use error::FetchError;
