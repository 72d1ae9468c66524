//! Admin Scaffolder Core - Shared library for the Clown Admin scaffolding CLI
//!
//! This library creates admin projects from a template and adds pages to them.
//! Adding a page edits existing TypeScript sources (route tables, type barrels,
//! model registries) through syntax-tree aware mutations that keep the rest of
//! each file byte-for-byte intact.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Source mutation, template fetching and rendering, tool detection
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait and staged `ChangeSet` plans
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use admin_scaffolder_core::{MutationRequest, SourceMutator};
//!
//! let source = std::fs::read_to_string("src/type/index.ts")?;
//! let request = MutationRequest::AddTypeExport { module_name: "report".into() };
//! let updated = SourceMutator::default().mutate(&source, &request)?;
//! ```

pub mod config;
pub mod generators;
pub mod mutate;
pub mod naming;
pub mod product;
pub mod runtime;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::ProjectLayout;
pub use generators::{ChangeSet, NewPageRequest, PagePlan};
pub use mutate::{
    Diagnostic, LayoutFlags, ModelBinding, MutationError, MutationRequest, RouteEntry,
    SourceMutator,
};
pub use product::ProductConfig;
pub use runtime::{check_tools, RuntimeInfo, Tool};
pub use templates::{fetch_template, TemplateSource};

#[cfg(feature = "tui")]
pub use tui::{create, new_page};
