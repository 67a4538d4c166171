//! Core library for user-directory.
//!
//! The data-view pipeline behind the terminal front-end:
//!
//! - `api`: HTTP client for the user endpoint and the typed fetch errors
//! - `cache`: single-slot snapshot persistence with a freshness window
//! - `view`: filter/sort derivation and the view state it keeps consistent
//! - `render`: the `View` handle and what each region shows
//! - `directory`: orchestration of fetch, cache, filter, sort and render
//! - `config`: configuration file and environment overrides

pub mod api;
pub mod cache;
pub mod config;
pub mod directory;
pub mod models;
pub mod render;
pub mod utils;
pub mod view;

pub use api::{ConnectionStatus, FetchError, UserClient, UserSource};
pub use cache::{CacheManager, Snapshot};
pub use config::Config;
pub use directory::UserDirectory;
pub use models::UserRecord;
pub use render::{EmptyState, UserCard, View};
pub use view::{SortKey, ViewState};
