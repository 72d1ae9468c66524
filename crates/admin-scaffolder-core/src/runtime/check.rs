//! Detection of the external tools the scaffolder shells out to

use anyhow::Result;
use std::fmt;
use std::process::Command;

/// External tools the flows care about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Needed to clone the remote template
    Git,
    /// Needed afterwards to install and run the generated project
    Node,
}

impl Tool {
    pub fn display_name(&self) -> &'static str {
        match self {
            Tool::Git => "Git",
            Tool::Node => "Node.js",
        }
    }

    fn binary(&self) -> &'static str {
        match self {
            Tool::Git => "git",
            Tool::Node => "node",
        }
    }

    fn install_hint(&self) -> &'static str {
        match self {
            Tool::Git => "install from https://git-scm.com",
            Tool::Node => "install from https://nodejs.org",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Tool detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

/// Check whether `tool` runs and report its version
pub fn check_tool(tool: Tool) -> RuntimeInfo {
    let output = Command::new(tool.binary()).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            RuntimeInfo {
                name: tool.display_name(),
                version: Some(version),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name: tool.display_name(),
            version: None,
            available: false,
        },
    }
}

/// Check if Git is available
pub fn check_git() -> RuntimeInfo {
    check_tool(Tool::Git)
}

/// Check if Node.js is available
pub fn check_node() -> RuntimeInfo {
    check_tool(Tool::Node)
}

/// Fail with an install hint unless Git is available
pub fn require_git() -> Result<RuntimeInfo> {
    let mut found = check_tools(&[Tool::Git], &[])?;
    found
        .pop()
        .ok_or_else(|| anyhow::anyhow!("Git detection returned no result"))
}

/// Check tools; those in `advisory` get availability reported but don't cause failure.
pub fn check_tools(required: &[Tool], advisory: &[Tool]) -> Result<Vec<RuntimeInfo>> {
    let mut results = Vec::new();
    let mut missing = Vec::new();

    for tool in required.iter().chain(advisory) {
        let info = check_tool(*tool);
        if !info.available && !advisory.contains(tool) {
            missing.push(format!("{} ({})", tool.display_name(), tool.install_hint()));
        }
        results.push(info);
    }

    if !missing.is_empty() {
        anyhow::bail!(
            "Missing required tools:\n{}",
            missing
                .iter()
                .map(|m| format!("  - {}", m))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advisory_tools_never_fail() {
        let results = check_tools(&[], &[Tool::Git, Tool::Node]).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "Git");
    }

    #[test]
    fn test_unavailable_tool_has_no_version() {
        let info = check_git();
        assert_eq!(info.available, info.version.is_some());
    }
}
