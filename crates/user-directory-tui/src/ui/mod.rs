//! Terminal UI module using ratatui.
//!
//! - `screen`: the `View` implementation the core pipeline writes into
//! - `render`: frame rendering and layout
//! - `input`: keyboard event handling
//! - `styles`: color scheme and text styling

pub mod input;
pub mod render;
pub mod screen;
pub mod styles;
