//! Data models for directory entities.
//!
//! - `UserRecord`: a user as received from the endpoint, with its nested
//!   `Address` and `Company`

pub mod user;

pub use user::{Address, Company, UserRecord, PLACEHOLDER};
