//! Product configuration trait for CLI binaries
//!
//! This trait defines the interface a CLI binary implements to point the
//! scaffolding flows at its own admin template.

use std::path::Path;

/// Configuration trait for the scaffolding CLI
///
/// A product defines:
/// - Product identity (name, display name)
/// - The template repository and branch
/// - Documentation links
/// - Post-setup instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Git URL of the project template repository
    fn default_template_url(&self) -> &'static str;

    /// Environment variable name for overriding the template URL
    fn template_url_env(&self) -> &'static str;

    /// Branch checked out when cloning the template
    fn template_branch(&self) -> &'static str {
        "master"
    }

    /// URL for product documentation
    fn docs_url(&self) -> &'static str;

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, dir: &Path) -> Vec<String>;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;
}
