//! Bootstrap of the AnkerSPA PAT directory structure.

use crate::error::Result;
use crate::io;
use crate::paths;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Version of the bundled PAT template set.
pub const SPA_TEMPLATE_VERSION: &str = "2025.11.06";

/// Directories created under the project root, in creation order.
pub const SPA_DIRECTORIES: &[&str] = &[
    "AnkerSPA",
    "AnkerSPA/MetaData",
    "AnkerSPA/Input",
    "AnkerSPA/Output",
    "AnkerSPA/Output/requirement",
    "AnkerSPA/Output/design",
    "AnkerSPA/Output/code",
    "AnkerSPA/Output/reports",
    "AnkerSPA/Practice",
    "AnkerSPA/Plan",
    "AnkerSPA/Checklist",
    "AnkerSPA/Reference",
    "AnkerSPA/Tool",
    "AnkerSPA/Objective",
    "AnkerSPA/AA",
    "AnkerSPA/AA/AA1-RequirementAnalyzer",
    "AnkerSPA/AA/AA2-TechnicalDesigner",
    "AnkerSPA/AA/AA3-CodeGenerator",
    "AnkerSPA/AA/AA4-QualityChecker",
    "AnkerSPA/Output/code/app/api",
    "AnkerSPA/Output/code/app/models",
    "AnkerSPA/Output/code/app/services",
    "AnkerSPA/Output/code/app/repositories",
    "AnkerSPA/Output/code/tests",
    "AnkerSPA/Output/code/docs",
    "AnkerSPA/Practice/.staging",
];

/// `(path relative to the project root, content)`
pub const SPA_TEMPLATE_FILES: &[(&str, &str)] = &[
    (
        "AnkerSPA/MetaData/spa-info.yaml",
        include_str!("../../templates/spa/AnkerSPA/MetaData/spa-info.yaml"),
    ),
    (
        "AnkerSPA/MetaData/dependencies.yaml",
        include_str!("../../templates/spa/AnkerSPA/MetaData/dependencies.yaml"),
    ),
    (
        "AnkerSPA/Input/requirement.md",
        include_str!("../../templates/spa/AnkerSPA/Input/requirement.md"),
    ),
    (
        "AnkerSPA/Input/context.json",
        include_str!("../../templates/spa/AnkerSPA/Input/context.json"),
    ),
    ("AnkerSPA/Output/requirement/.gitkeep", "\n"),
    ("AnkerSPA/Output/design/.gitkeep", "\n"),
    ("AnkerSPA/Output/code/.gitkeep", "\n"),
    ("AnkerSPA/Output/reports/.gitkeep", "\n"),
    (
        "AnkerSPA/Plan/workflow.yaml",
        include_str!("../../templates/spa/AnkerSPA/Plan/workflow.yaml"),
    ),
    (
        "AnkerSPA/Plan/aa-orchestration.yaml",
        include_str!("../../templates/spa/AnkerSPA/Plan/aa-orchestration.yaml"),
    ),
    (
        "AnkerSPA/Checklist/requirement-checklist.yaml",
        include_str!("../../templates/spa/AnkerSPA/Checklist/requirement-checklist.yaml"),
    ),
    (
        "AnkerSPA/Checklist/design-checklist.yaml",
        include_str!("../../templates/spa/AnkerSPA/Checklist/design-checklist.yaml"),
    ),
    (
        "AnkerSPA/Checklist/code-checklist.yaml",
        include_str!("../../templates/spa/AnkerSPA/Checklist/code-checklist.yaml"),
    ),
    (
        "AnkerSPA/Reference/coding-standard.md",
        include_str!("../../templates/spa/AnkerSPA/Reference/coding-standard.md"),
    ),
    (
        "AnkerSPA/Reference/tech-stack.yaml",
        include_str!("../../templates/spa/AnkerSPA/Reference/tech-stack.yaml"),
    ),
    (
        "AnkerSPA/Reference/api-design-guide.md",
        include_str!("../../templates/spa/AnkerSPA/Reference/api-design-guide.md"),
    ),
    ("AnkerSPA/Practice/.gitkeep", "\n"),
    (
        "AnkerSPA/Tool/claude-api.yaml",
        include_str!("../../templates/spa/AnkerSPA/Tool/claude-api.yaml"),
    ),
    (
        "AnkerSPA/Objective/success-criteria.yaml",
        include_str!("../../templates/spa/AnkerSPA/Objective/success-criteria.yaml"),
    ),
    (
        "AnkerSPA/AA/AA1-RequirementAnalyzer/metadata.yaml",
        include_str!("../../templates/spa/AnkerSPA/AA/AA1-RequirementAnalyzer/metadata.yaml"),
    ),
    (
        "AnkerSPA/AA/AA1-RequirementAnalyzer/prompt-template.md",
        include_str!("../../templates/spa/AnkerSPA/AA/AA1-RequirementAnalyzer/prompt-template.md"),
    ),
    (
        "AnkerSPA/AA/AA1-RequirementAnalyzer/checklist.yaml",
        include_str!("../../templates/spa/AnkerSPA/AA/AA1-RequirementAnalyzer/checklist.yaml"),
    ),
    (
        "AnkerSPA/AA/AA2-TechnicalDesigner/metadata.yaml",
        include_str!("../../templates/spa/AnkerSPA/AA/AA2-TechnicalDesigner/metadata.yaml"),
    ),
    (
        "AnkerSPA/AA/AA2-TechnicalDesigner/prompt-template.md",
        include_str!("../../templates/spa/AnkerSPA/AA/AA2-TechnicalDesigner/prompt-template.md"),
    ),
    (
        "AnkerSPA/AA/AA2-TechnicalDesigner/checklist.yaml",
        include_str!("../../templates/spa/AnkerSPA/AA/AA2-TechnicalDesigner/checklist.yaml"),
    ),
    (
        "AnkerSPA/AA/AA3-CodeGenerator/metadata.yaml",
        include_str!("../../templates/spa/AnkerSPA/AA/AA3-CodeGenerator/metadata.yaml"),
    ),
    (
        "AnkerSPA/AA/AA3-CodeGenerator/prompt-template.md",
        include_str!("../../templates/spa/AnkerSPA/AA/AA3-CodeGenerator/prompt-template.md"),
    ),
    (
        "AnkerSPA/AA/AA3-CodeGenerator/checklist.yaml",
        include_str!("../../templates/spa/AnkerSPA/AA/AA3-CodeGenerator/checklist.yaml"),
    ),
    (
        "AnkerSPA/AA/AA4-QualityChecker/metadata.yaml",
        include_str!("../../templates/spa/AnkerSPA/AA/AA4-QualityChecker/metadata.yaml"),
    ),
    (
        "AnkerSPA/AA/AA4-QualityChecker/prompt-template.md",
        include_str!("../../templates/spa/AnkerSPA/AA/AA4-QualityChecker/prompt-template.md"),
    ),
    (
        "AnkerSPA/AA/AA4-QualityChecker/checklist.yaml",
        include_str!("../../templates/spa/AnkerSPA/AA/AA4-QualityChecker/checklist.yaml"),
    ),
    (
        "AnkerSPA/Output/code/README.md",
        include_str!("../../templates/spa/AnkerSPA/Output/code/README.md"),
    ),
    (
        "AnkerSPA/Output/code/test-cases.json",
        include_str!("../../templates/spa/AnkerSPA/Output/code/test-cases.json"),
    ),
    (
        "AnkerSPA/Output/reports/quality-report.md",
        include_str!("../../templates/spa/AnkerSPA/Output/reports/quality-report.md"),
    ),
    (
        "AnkerSPA/Output/reports/execution-metrics.json",
        include_str!("../../templates/spa/AnkerSPA/Output/reports/execution-metrics.json"),
    ),
    ("AnkerSPA/Practice/.staging/.gitkeep", "\n"),
];

#[derive(Debug, Clone, Serialize)]
pub struct InitializationResult {
    pub root: PathBuf,
    pub created_directories: Vec<PathBuf>,
    pub created_files: Vec<PathBuf>,
    pub skipped_files: Vec<PathBuf>,
}

/// Ensure the AnkerSPA PAT structure exists within `project_path`.
///
/// Existing files are left alone unless `force` is set. All reported paths are
/// relative to `project_path`.
pub fn initialize_spa_environment(project_path: &Path, force: bool) -> Result<InitializationResult> {
    let mut created_directories = Vec::new();
    let mut created_files = Vec::new();
    let mut skipped_files = Vec::new();

    for relative in SPA_DIRECTORIES {
        let target = project_path.join(relative);
        if !target.exists() {
            io::ensure_dir(&target)?;
            created_directories.push(PathBuf::from(relative));
        }
    }

    for (relative, content) in SPA_TEMPLATE_FILES {
        let target = project_path.join(relative);
        if io::write_file(&target, content.as_bytes(), force)? {
            tracing::debug!(path = relative, "wrote PAT template");
            created_files.push(PathBuf::from(relative));
        } else {
            skipped_files.push(PathBuf::from(relative));
        }
    }

    Ok(InitializationResult {
        root: paths::spa_dir(project_path),
        created_directories,
        created_files,
        skipped_files,
    })
}
