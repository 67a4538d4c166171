//! Client-side data view: the filter/sort stage and the state it keeps
//! consistent.

pub mod filter;
pub mod state;

pub use filter::{derive, derive_indices, SortKey};
pub use state::ViewState;
