//! Templates compiled into the binary, with an optional on-disk overlay.
//!
//! Keys are paths relative to the template tree root, e.g.
//! `scripts/bash/common.sh` or `commands/plan.md`. An overlay directory
//! (a spec-kit source checkout) may shadow any key with
//! `<overlay>/templates/<key>`.

use crate::error::Result;
use crate::scripts::ScriptVariant;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Version stamp of the embedded template set.
pub const TEMPLATE_VERSION: &str = "2025.11.06";

pub const COMMAND_TEMPLATES: &[(&str, &str)] = &[
    ("specify", include_str!("../templates/commands/specify.md")),
    ("plan", include_str!("../templates/commands/plan.md")),
    ("tasks", include_str!("../templates/commands/tasks.md")),
];

const SH_SCRIPTS: &[(&str, &str)] = &[
    ("common.sh", include_str!("../templates/scripts/bash/common.sh")),
    (
        "create-new-feature.sh",
        include_str!("../templates/scripts/bash/create-new-feature.sh"),
    ),
    ("setup-plan.sh", include_str!("../templates/scripts/bash/setup-plan.sh")),
    (
        "check-prerequisites.sh",
        include_str!("../templates/scripts/bash/check-prerequisites.sh"),
    ),
];

const PS_SCRIPTS: &[(&str, &str)] = &[
    ("common.ps1", include_str!("../templates/scripts/powershell/common.ps1")),
    (
        "create-new-feature.ps1",
        include_str!("../templates/scripts/powershell/create-new-feature.ps1"),
    ),
    (
        "setup-plan.ps1",
        include_str!("../templates/scripts/powershell/setup-plan.ps1"),
    ),
    (
        "check-prerequisites.ps1",
        include_str!("../templates/scripts/powershell/check-prerequisites.ps1"),
    ),
];

/// `(file name under .specify/memory, content)`
pub const MEMORY_FILES: &[(&str, &str)] = &[(
    "constitution.md",
    include_str!("../templates/memory/constitution.md"),
)];

/// `(file name under .specify/templates, content)`
pub const DOCUMENT_TEMPLATES: &[(&str, &str)] = &[
    ("spec-template.md", include_str!("../templates/documents/spec-template.md")),
    ("plan-template.md", include_str!("../templates/documents/plan-template.md")),
    ("tasks-template.md", include_str!("../templates/documents/tasks-template.md")),
];

/// Script file names and contents for one variant.
pub fn scripts_for(variant: ScriptVariant) -> &'static [(&'static str, &'static str)] {
    match variant {
        ScriptVariant::Sh => SH_SCRIPTS,
        ScriptVariant::Ps => PS_SCRIPTS,
    }
}

/// Where template content is read from.
#[derive(Debug, Clone, Default)]
pub struct TemplateSource {
    overlay: Option<PathBuf>,
}

impl TemplateSource {
    pub fn embedded() -> Self {
        Self { overlay: None }
    }

    /// Shadow embedded templates with files from `<src>/templates/`.
    pub fn with_overlay(src: impl Into<PathBuf>) -> Self {
        Self {
            overlay: Some(src.into()),
        }
    }

    pub fn overlay(&self) -> Option<&Path> {
        self.overlay.as_deref()
    }

    /// Resolve `key`, preferring the overlay copy when one exists.
    pub fn read(&self, key: &str, embedded: &'static str) -> Result<Cow<'static, str>> {
        if let Some(src) = &self.overlay {
            let candidate = src.join("templates").join(key);
            if candidate.is_file() {
                tracing::debug!(key, path = %candidate.display(), "using overlay template");
                return Ok(Cow::Owned(std::fs::read_to_string(&candidate)?));
            }
        }
        Ok(Cow::Borrowed(embedded))
    }
}
