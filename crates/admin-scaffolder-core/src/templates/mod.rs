//! Template fetching, rendering and boilerplate
//!
//! This module provides:
//! - Template materialization from a git remote or a local directory
//! - `<%= key %>` placeholder rendering
//! - Bodies of the type, model and page files created for a new page

pub mod boilerplate;
pub mod fetcher;
pub mod render;

pub use fetcher::{fetch_template, TemplateSource};
pub use render::render;
