//! Project layout configuration

pub mod layout;

pub use layout::{ProjectLayout, LAYOUT_FILE};
