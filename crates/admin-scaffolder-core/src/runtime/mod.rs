//! Detection of external tools (git for cloning, Node.js for the generated project)

pub mod check;

pub use check::{check_git, check_node, check_tools, require_git, RuntimeInfo, Tool};
