//! Scaffolding flows
//!
//! Each flow plans its file changes into a [`ChangeSet`] before anything is
//! written, so a failing step leaves the project as it was.

pub mod page;
pub mod project;
pub mod staging;

pub use page::{list_projects, plan_new_page, NewPageRequest, PagePlan};
pub use project::{clear_target, plan_project_setup};
pub use staging::{ChangeKind, ChangeSet, StagedFile};
