//! `specify init`: lays down the spec-driven development skeleton.

use crate::assistant::AiAgent;
use crate::commands::CommandTemplate;
use crate::config::InitOptions;
use crate::error::{Result, SpecifyError};
use crate::io;
use crate::paths;
use crate::scripts::{ensure_executable_scripts, PermissionReport, ScriptVariant};
use crate::spa::{initialize_spa_environment, InitializationResult};
use crate::templates::{self, TemplateSource};
use crate::tools;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    /// `None` or `"."` together with `here` targets the working directory.
    pub project_name: Option<String>,
    pub here: bool,
    pub ai: AiAgent,
    /// `None` picks the host default.
    pub script: Option<ScriptVariant>,
    pub ignore_agent_tools: bool,
    pub force: bool,
    pub no_git: bool,
    pub spa: bool,
    pub templates: TemplateSource,
    /// Stamped into `init-options.yaml`.
    pub specify_version: Option<String>,
}

impl ScaffoldOptions {
    pub fn new(project_name: Option<String>, ai: AiAgent) -> Self {
        Self {
            project_name,
            here: false,
            ai,
            script: None,
            ignore_agent_tools: false,
            force: false,
            no_git: false,
            spa: false,
            templates: TemplateSource::embedded(),
            specify_version: None,
        }
    }
}

/// Where init writes and what the project is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldTarget {
    pub root: PathBuf,
    pub project: String,
    pub here: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GitOutcome {
    Skipped,
    Unavailable,
    AlreadyRepository,
    Initialized,
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ScaffoldReport {
    pub project: String,
    pub root: PathBuf,
    pub ai: AiAgent,
    pub script: ScriptVariant,
    /// Paths relative to `root`.
    pub written: Vec<PathBuf>,
    pub kept: Vec<PathBuf>,
    pub permissions: PermissionReport,
    pub git: GitOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spa: Option<InitializationResult>,
}

// ---------------------------------------------------------------------------
// Target resolution
// ---------------------------------------------------------------------------

pub fn resolve_target(
    cwd: &Path,
    project_name: Option<&str>,
    here: bool,
    force: bool,
) -> Result<ScaffoldTarget> {
    let in_place = here || project_name == Some(".");
    if in_place {
        if let Some(name) = project_name.filter(|n| *n != ".") {
            return Err(SpecifyError::ConflictingTarget(name.to_string()));
        }
        if !force && !io::is_empty_dir(cwd)? {
            return Err(SpecifyError::DirectoryNotEmpty(cwd.to_path_buf()));
        }
        let project = cwd
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string());
        return Ok(ScaffoldTarget {
            root: cwd.to_path_buf(),
            project,
            here: true,
        });
    }

    let name = project_name.ok_or(SpecifyError::MissingProjectName)?;
    paths::validate_project_name(name)?;
    let root = cwd.join(name);
    if root.exists() {
        return Err(SpecifyError::ProjectExists(root));
    }
    Ok(ScaffoldTarget {
        root,
        project: name.to_string(),
        here: false,
    })
}

/// Fail when `ai` needs a CLI that cannot be found.
pub fn verify_agent_tool(ai: AiAgent) -> Result<()> {
    let Some(tool) = ai.cli_tool() else {
        return Ok(());
    };
    if tools::is_installed(tool) {
        return Ok(());
    }
    Err(SpecifyError::AgentToolMissing {
        tool: tool.to_string(),
        hint: ai.install_hint().to_string(),
    })
}

// ---------------------------------------------------------------------------
// Scaffold
// ---------------------------------------------------------------------------

struct Writer<'a> {
    root: &'a Path,
    force: bool,
    written: Vec<PathBuf>,
    kept: Vec<PathBuf>,
}

impl Writer<'_> {
    fn write(&mut self, rel: PathBuf, content: &str) -> Result<()> {
        if io::write_file(&self.root.join(&rel), content.as_bytes(), self.force)? {
            tracing::debug!(path = %rel.display(), "wrote");
            self.written.push(rel);
        } else {
            tracing::debug!(path = %rel.display(), "kept existing file");
            self.kept.push(rel);
        }
        Ok(())
    }
}

pub fn scaffold(cwd: &Path, opts: &ScaffoldOptions) -> Result<ScaffoldReport> {
    let target = resolve_target(cwd, opts.project_name.as_deref(), opts.here, opts.force)?;
    if !opts.ignore_agent_tools {
        verify_agent_tool(opts.ai)?;
    }
    let variant = ScriptVariant::resolve(opts.script);
    let root = target.root.as_path();
    io::ensure_dir(root)?;

    let mut writer = Writer {
        root,
        force: opts.force,
        written: Vec::new(),
        kept: Vec::new(),
    };
    let src = &opts.templates;

    for &(name, embedded) in templates::MEMORY_FILES {
        let content = src.read(&format!("memory/{name}"), embedded)?;
        writer.write(PathBuf::from(paths::MEMORY_DIR).join(name), &content)?;
    }
    for &(name, embedded) in templates::DOCUMENT_TEMPLATES {
        let content = src.read(&format!("documents/{name}"), embedded)?;
        writer.write(PathBuf::from(paths::TEMPLATES_DIR).join(name), &content)?;
    }
    for &(name, embedded) in templates::scripts_for(variant) {
        let key = format!("scripts/{}/{name}", variant.template_dir());
        let content = src.read(&key, embedded)?;
        writer.write(PathBuf::from(paths::SCRIPTS_DIR).join(name), &content)?;
    }
    let permissions = ensure_executable_scripts(&paths::scripts_dir(root));
    for failure in &permissions.failures {
        tracing::warn!(path = %failure.path.display(), reason = %failure.reason, "could not mark script executable");
    }

    for &(name, embedded) in templates::COMMAND_TEMPLATES {
        let source = src.read(&format!("commands/{name}.md"), embedded)?;
        let command = CommandTemplate::parse(name, &source)?;
        let rel = PathBuf::from(opts.ai.commands_dir()).join(opts.ai.command_file_name(name));
        writer.write(rel, &command.render(opts.ai, variant)?)?;
    }

    let mut options = InitOptions::new(&target.project, opts.ai, variant);
    options.specify_version = opts.specify_version.clone();
    options.spa = opts.spa;
    options.save(root)?;
    writer.written.push(PathBuf::from(paths::INIT_OPTIONS_FILE));

    let spa = if opts.spa {
        Some(initialize_spa_environment(root, opts.force)?)
    } else {
        None
    };

    let git = if opts.no_git {
        GitOutcome::Skipped
    } else {
        init_git_repository(root)
    };

    Ok(ScaffoldReport {
        project: target.project,
        root: target.root.clone(),
        ai: opts.ai,
        script: variant,
        written: writer.written,
        kept: writer.kept,
        permissions,
        git,
        spa,
    })
}

// ---------------------------------------------------------------------------
// Git
// ---------------------------------------------------------------------------

pub fn is_git_repository(dir: &Path) -> bool {
    Command::new("git")
        .args(["rev-parse", "--is-inside-work-tree"])
        .current_dir(dir)
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Run `git init` unless `dir` is already inside a work tree. Never fails.
pub fn init_git_repository(dir: &Path) -> GitOutcome {
    if !tools::is_installed("git") {
        return GitOutcome::Unavailable;
    }
    if is_git_repository(dir) {
        return GitOutcome::AlreadyRepository;
    }
    match Command::new("git").arg("init").current_dir(dir).output() {
        Ok(out) if out.status.success() => GitOutcome::Initialized,
        Ok(out) => {
            let reason = String::from_utf8_lossy(&out.stderr).trim().to_string();
            tracing::warn!(%reason, "git init failed");
            GitOutcome::Failed { reason }
        }
        Err(e) => {
            tracing::warn!(error = %e, "git init failed");
            GitOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}
