use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecifyError {
    #[error("not initialized: run 'specify init' (no .specify/ found in {0})")]
    NotInitialized(PathBuf),

    #[error("invalid project name '{0}': use letters, digits, '-', '_' or '.', not starting with '-' or '.'")]
    InvalidProjectName(String),

    #[error("project name required: pass <project-name> or --here")]
    MissingProjectName,

    #[error("cannot combine project name '{0}' with --here")]
    ConflictingTarget(String),

    #[error("directory already exists: {0}")]
    ProjectExists(PathBuf),

    #[error("directory is not empty: {0} (use --force to merge into it)")]
    DirectoryNotEmpty(PathBuf),

    #[error("unknown AI agent '{0}'; supported: claude, gemini, copilot, cursor, qwen, opencode, codex, windsurf")]
    UnknownAgent(String),

    #[error("unknown script variant '{0}'; supported: sh, ps")]
    UnknownScriptVariant(String),

    #[error("{tool} not found: install it or rerun with --ignore-agent-tools ({hint})")]
    AgentToolMissing { tool: String, hint: String },

    #[error("invalid command template '{name}': {reason}")]
    InvalidCommandTemplate { name: String, reason: String },

    #[error("AnkerSPA directory not found: {0}")]
    SpaNotFound(PathBuf),

    #[error("agent metadata missing required field '{field}' at {path}")]
    AgentMetadataMissing { field: String, path: PathBuf },

    #[error("agent {agent} metadata field {field} must be a list of strings")]
    AgentMetadataField { agent: String, field: String },

    #[error("unknown agent kind: {kind} (agent: {agent})")]
    UnknownAgentKind { kind: String, agent: String },

    #[error("agent for stage {stage} not found: {agent}")]
    StageAgentNotFound { stage: String, agent: String },

    #[error("missing required inputs for {agent}: {missing}")]
    MissingInputs { agent: String, missing: String },

    #[error("invalid workflow: {0}")]
    InvalidWorkflow(String),

    #[error("http error: {0}")]
    Http(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for SpecifyError {
    fn from(e: reqwest::Error) -> Self {
        SpecifyError::Http(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SpecifyError>;
