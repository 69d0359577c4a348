use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use specify_core::spa::{self, AnkerSpa, PromotionOutcome};
use std::path::Path;

#[derive(Subcommand)]
pub enum SpaSubcommand {
    /// Create the AnkerSPA directory structure and templates
    Init {
        /// Overwrite existing template files
        #[arg(long)]
        force: bool,
    },

    /// List registered Activity Agents
    Agents,

    /// List workflow stages in execution order
    Stages,

    /// Execute workflow stages
    Run {
        /// Stage key or agent id to run (repeatable; default: all stages)
        #[arg(long = "stage", value_name = "KEY|AGENT")]
        stages: Vec<String>,

        /// Overwrite existing stage outputs
        #[arg(long)]
        force: bool,
    },

    /// Promote the current run into Practice/ when it meets the score threshold
    Promote,
}

pub fn run(root: &Path, subcmd: SpaSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        SpaSubcommand::Init { force } => init(root, force, json),
        SpaSubcommand::Agents => agents(root, json),
        SpaSubcommand::Stages => stages(root, json),
        SpaSubcommand::Run { stages, force } => run_stages(root, &stages, force, json),
        SpaSubcommand::Promote => promote(root, json),
    }
}

fn open(root: &Path) -> anyhow::Result<AnkerSpa> {
    AnkerSpa::open(root).context("failed to load AnkerSPA workspace")
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

fn init(root: &Path, force: bool, json: bool) -> anyhow::Result<()> {
    let result = spa::initialize_spa_environment(root, force)
        .context("failed to initialize AnkerSPA")?;

    if json {
        return print_json(&result);
    }

    println!("AnkerSPA initialized at: {}", result.root.display());
    for path in &result.created_files {
        println!("  created: {}", path.display());
    }
    for path in &result.skipped_files {
        println!("  exists:  {}", path.display());
    }
    if !result.skipped_files.is_empty() && !force {
        println!("\nUse --force to overwrite existing templates.");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// agents / stages
// ---------------------------------------------------------------------------

fn agents(root: &Path, json: bool) -> anyhow::Result<()> {
    let spa = open(root)?;
    let agents: Vec<_> = spa.agents().collect();

    if json {
        return print_json(&agents);
    }
    if agents.is_empty() {
        println!("No agents registered.");
        return Ok(());
    }
    let rows = agents
        .iter()
        .map(|a| {
            vec![
                a.id.clone(),
                a.name.clone(),
                a.kind.clone(),
                a.version.clone(),
                a.description.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "KIND", "VERSION", "DESCRIPTION"], rows);
    Ok(())
}

fn stages(root: &Path, json: bool) -> anyhow::Result<()> {
    let spa = open(root)?;
    let stages = spa.list_stages()?;

    if json {
        return print_json(&stages);
    }
    let rows = stages
        .iter()
        .map(|s| {
            vec![
                s.key.clone(),
                s.label.clone(),
                s.agent.clone(),
                s.depends_on.join(", "),
                if s.human_review_enabled { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    print_table(&["STAGE", "LABEL", "AGENT", "DEPENDS ON", "REVIEW"], rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

fn run_stages(root: &Path, only: &[String], force: bool, json: bool) -> anyhow::Result<()> {
    let spa = open(root)?;
    let report = spa.run(force, only).context("stage execution failed")?;

    if json {
        return print_json(&report);
    }
    if report.stages.is_empty() {
        println!("No stages matched.");
        return Ok(());
    }
    for outcome in &report.stages {
        println!(
            "[{}] {} ({}: {})",
            outcome.stage, outcome.label, outcome.agent, outcome.agent_name
        );
        println!("  {}", outcome.report.message);
        for path in &outcome.report.written {
            println!("  wrote: {}", path.display());
        }
        if let Some(prompt) = &outcome.review_prompt {
            println!("  review: {prompt}");
        }
    }
    println!("\nExecuted stages: {}", report.executed.join(", "));
    Ok(())
}

// ---------------------------------------------------------------------------
// promote
// ---------------------------------------------------------------------------

fn promote(root: &Path, json: bool) -> anyhow::Result<()> {
    let spa = open(root)?;
    let outcome = spa
        .promote_practice()
        .context("failed to promote practice case")?;

    if json {
        return print_json(&outcome);
    }
    match outcome {
        PromotionOutcome::Disabled => println!("Practice promotion is disabled."),
        PromotionOutcome::MissingMetrics { path } => {
            println!("No metrics found at {}; skipped promotion.", path.display())
        }
        PromotionOutcome::InvalidMetrics { path, reason } => {
            println!("warning: could not parse {}: {reason}", path.display())
        }
        PromotionOutcome::BelowThreshold { score, threshold } => {
            println!("Score {score} is below the knowledge threshold {threshold}; skipped promotion.")
        }
        PromotionOutcome::Promoted {
            case_dir,
            files_copied,
        } => println!(
            "Promoted practice case: {} ({files_copied} file(s) copied)",
            case_dir.display()
        ),
    }
    Ok(())
}
