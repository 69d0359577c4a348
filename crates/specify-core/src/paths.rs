use crate::error::{Result, SpecifyError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const SPECIFY_DIR: &str = ".specify";
pub const MEMORY_DIR: &str = ".specify/memory";
pub const TEMPLATES_DIR: &str = ".specify/templates";
pub const SCRIPTS_DIR: &str = "scripts";

pub const INIT_OPTIONS_FILE: &str = ".specify/init-options.yaml";

pub const SPA_DIR: &str = "AnkerSPA";
pub const SPA_METADATA_DIR: &str = "MetaData";
pub const SPA_AGENTS_DIR: &str = "AA";
pub const SPA_PRACTICE_DIR: &str = "Practice";
pub const SPA_WORKFLOW_FILE: &str = "Plan/workflow.yaml";
pub const SPA_ORCHESTRATION_FILE: &str = "Plan/aa-orchestration.yaml";

pub const AGENT_METADATA_FILE: &str = "metadata.yaml";
pub const AGENT_PROMPT_FILE: &str = "prompt-template.md";
pub const AGENT_CHECKLIST_FILE: &str = "checklist.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn specify_dir(root: &Path) -> PathBuf {
    root.join(SPECIFY_DIR)
}

pub fn init_options_path(root: &Path) -> PathBuf {
    root.join(INIT_OPTIONS_FILE)
}

pub fn scripts_dir(root: &Path) -> PathBuf {
    root.join(SCRIPTS_DIR)
}

pub fn spa_dir(root: &Path) -> PathBuf {
    root.join(SPA_DIR)
}

/// Location of the Claude CLI when installed through `claude migrate-installer`,
/// which leaves no executable on PATH.
pub fn claude_local_cli() -> Option<PathBuf> {
    home::home_dir().map(|h| h.join(".claude").join("local").join("claude"))
}

// ---------------------------------------------------------------------------
// Project name validation
// ---------------------------------------------------------------------------

static PROJECT_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn project_name_re() -> &'static Regex {
    PROJECT_NAME_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.\-]*$").unwrap())
}

pub fn validate_project_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > 100 || !project_name_re().is_match(name) {
        return Err(SpecifyError::InvalidProjectName(name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
