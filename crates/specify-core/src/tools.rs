//! Detection of the external tools a scaffolded project relies on.

use crate::assistant::AiAgent;
use crate::paths;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct ToolStatus {
    /// Tool key as shown to the user (`git`, `claude`, `code`, ...).
    pub name: String,
    pub description: String,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Locate `tool`, returning the resolved executable path.
///
/// The Claude CLI is also accepted at `~/.claude/local/claude`, where the
/// migrated installer places it without touching PATH.
pub fn find_tool(tool: &str) -> Option<PathBuf> {
    if tool == "claude" {
        if let Some(local) = paths::claude_local_cli() {
            if local.is_file() {
                return Some(local);
            }
        }
    }
    which::which(tool).ok()
}

pub fn is_installed(tool: &str) -> bool {
    find_tool(tool).is_some()
}

fn detect(name: &str, description: &str) -> ToolStatus {
    let path = find_tool(name);
    ToolStatus {
        name: name.to_string(),
        description: description.to_string(),
        found: path.is_some(),
        path,
    }
}

/// Detect git, every agent CLI, and VS Code (used by Copilot).
pub fn check_all() -> Vec<ToolStatus> {
    let mut statuses = vec![detect("git", "Git version control")];
    for agent in AiAgent::all() {
        if let Some(tool) = agent.cli_tool() {
            statuses.push(detect(tool, agent.display_name()));
        }
    }
    statuses.push(detect("code", "Visual Studio Code"));
    statuses.push(detect("code-insiders", "Visual Studio Code Insiders"));
    statuses
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_all_covers_every_cli_agent() {
        let statuses = check_all();
        assert_eq!(statuses[0].name, "git");
        for agent in AiAgent::all() {
            if let Some(tool) = agent.cli_tool() {
                assert!(statuses.iter().any(|s| s.name == tool), "missing {tool}");
            }
        }
    }

    #[test]
    fn unknown_tool_is_not_found() {
        assert!(!is_installed("definitely-not-a-real-tool-9f3a"));
        let status = detect("definitely-not-a-real-tool-9f3a", "nothing");
        assert!(!status.found);
        assert!(status.path.is_none());
    }
}
