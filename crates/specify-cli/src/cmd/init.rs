use crate::output::print_json;
use anyhow::Context;
use clap::Args;
use specify_core::{
    assistant::AiAgent,
    network::{self, ReleaseChannel, ReleaseCheck},
    scaffold::{self, GitOutcome, ScaffoldOptions, ScaffoldReport},
    scripts::ScriptVariant,
    templates::TemplateSource,
};
use std::path::PathBuf;

/// Version of the specify binary embedded at compile time.
pub const SPECIFY_BINARY_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Args)]
pub struct InitArgs {
    /// Name of the new project directory ('.' for the current directory)
    pub project_name: Option<String>,

    /// AI assistant: claude, gemini, copilot, cursor, qwen, opencode, codex, windsurf
    #[arg(long, default_value = "claude")]
    pub ai: String,

    /// Script variant: sh or ps (default: host convention)
    #[arg(long)]
    pub script: Option<String>,

    /// Skip the check for the AI assistant CLI
    #[arg(long)]
    pub ignore_agent_tools: bool,

    /// Initialize in the current directory
    #[arg(long)]
    pub here: bool,

    /// Merge into a non-empty directory and overwrite existing files
    #[arg(long)]
    pub force: bool,

    /// Do not initialize a git repository
    #[arg(long)]
    pub no_git: bool,

    /// Also scaffold the AnkerSPA multi-agent workspace
    #[arg(long)]
    pub spa: bool,

    /// Disable TLS certificate verification for the release check
    #[arg(long)]
    pub skip_tls: bool,

    /// Skip the template release check
    #[arg(long, env = "SPECIFY_OFFLINE")]
    pub offline: bool,

    /// spec-kit source checkout whose templates/ override the embedded ones
    #[arg(long, env = "SPEC_KIT_SRC")]
    pub template_dir: Option<PathBuf>,
}

pub fn run(args: InitArgs, json: bool) -> anyhow::Result<()> {
    let ai: AiAgent = args.ai.parse()?;
    let script = args
        .script
        .as_deref()
        .map(str::parse::<ScriptVariant>)
        .transpose()?;
    let cwd = std::env::current_dir().context("failed to read current directory")?;

    let mut opts = ScaffoldOptions::new(args.project_name, ai);
    opts.here = args.here;
    opts.script = script;
    opts.ignore_agent_tools = args.ignore_agent_tools;
    opts.force = args.force;
    opts.no_git = args.no_git;
    opts.spa = args.spa;
    opts.specify_version = Some(SPECIFY_BINARY_VERSION.to_string());
    if let Some(dir) = args.template_dir {
        opts.templates = TemplateSource::with_overlay(dir);
    }

    if !json {
        match opts.project_name.as_deref() {
            Some(name) if name != "." && !opts.here => println!("Initializing project: {name}"),
            _ => println!("Initializing project in: {}", cwd.display()),
        }
    }

    let report = scaffold::scaffold(&cwd, &opts).context("init failed")?;

    let release = if args.offline {
        ReleaseCheck::Skipped
    } else {
        network::check_release(&ReleaseChannel::from_env(), args.skip_tls)
    };

    if json {
        let value = serde_json::json!({
            "project": report,
            "release": release,
        });
        return print_json(&value);
    }

    print_report(&report, &release);
    Ok(())
}

fn print_report(report: &ScaffoldReport, release: &ReleaseCheck) {
    for path in &report.written {
        println!("  created: {}", path.display());
    }
    for path in &report.kept {
        println!("  exists:  {}", path.display());
    }
    for failure in &report.permissions.failures {
        println!(
            "  warning: could not mark {} executable: {}",
            failure.path.display(),
            failure.reason
        );
    }
    if !report.permissions.updated.is_empty() {
        println!(
            "  updated execute permissions on {} script(s)",
            report.permissions.updated.len()
        );
    }

    if let Some(spa) = &report.spa {
        println!(
            "\nAnkerSPA: {} file(s) created, {} kept",
            spa.created_files.len(),
            spa.skipped_files.len()
        );
    }

    match &report.git {
        GitOutcome::Initialized => println!("\nInitialized git repository."),
        GitOutcome::AlreadyRepository => println!("\nExisting git repository detected; skipped git init."),
        GitOutcome::Unavailable => println!("\nwarning: git not found; skipped repository initialization."),
        GitOutcome::Failed { reason } => println!("\nwarning: git init failed: {reason}"),
        GitOutcome::Skipped => {}
    }

    match release {
        ReleaseCheck::Reachable { release } => {
            println!("Latest template release: {}", release.tag_name)
        }
        ReleaseCheck::Unreachable { reason } => {
            println!("warning: could not check template releases: {reason}")
        }
        ReleaseCheck::Skipped => {}
    }

    println!(
        "\nProject '{}' ready ({} assistant, {} scripts).",
        report.project,
        report.ai.display_name(),
        report.script.label()
    );
    println!(
        "Next: open the project and run /speckit.specify in {}",
        report.ai.display_name()
    );
}
