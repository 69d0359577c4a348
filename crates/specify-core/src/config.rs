use crate::assistant::AiAgent;
use crate::error::{Result, SpecifyError};
use crate::paths;
use crate::scripts::ScriptVariant;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// InitOptions
// ---------------------------------------------------------------------------

/// Choices recorded by `specify init` in `.specify/init-options.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitOptions {
    pub project: String,
    pub ai: AiAgent,
    pub script: ScriptVariant,
    pub template_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specify_version: Option<String>,
    #[serde(default)]
    pub spa: bool,
}

impl InitOptions {
    pub fn new(project: impl Into<String>, ai: AiAgent, script: ScriptVariant) -> Self {
        Self {
            project: project.into(),
            ai,
            script,
            template_version: crate::templates::TEMPLATE_VERSION.to_string(),
            specify_version: None,
            spa: false,
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::init_options_path(root);
        if !path.exists() {
            return Err(SpecifyError::NotInitialized(root.to_path_buf()));
        }
        let data = std::fs::read_to_string(&path)?;
        let opts: InitOptions = serde_yaml::from_str(&data)?;
        Ok(opts)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::init_options_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
