//! Runtime orchestration: executes Activity Agents stage by stage and
//! promotes well-scored runs into the `Practice/` knowledge base.

use super::agents::{instantiate_agent, load_agent_registry, AgentConfig, AgentReport};
use super::workflow::{StageDefinition, WorkflowDefinition};
use crate::error::{Result, SpecifyError};
use crate::io;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// OrchestrationConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationConfig {
    #[serde(default = "default_threshold")]
    pub knowledge_threshold: i64,
    #[serde(default = "default_auto_promote")]
    pub auto_promote_practice: bool,
    #[serde(default)]
    pub practice_files: Vec<String>,
    #[serde(default = "default_code_root")]
    pub practice_code_root: String,
    #[serde(default = "default_metrics_file")]
    pub metrics_file: String,
}

fn default_threshold() -> i64 {
    80
}

fn default_auto_promote() -> bool {
    true
}

fn default_code_root() -> String {
    "Output/code".to_string()
}

fn default_metrics_file() -> String {
    "Output/reports/execution-metrics.json".to_string()
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            knowledge_threshold: default_threshold(),
            auto_promote_practice: default_auto_promote(),
            practice_files: Vec::new(),
            practice_code_root: default_code_root(),
            metrics_file: default_metrics_file(),
        }
    }
}

impl OrchestrationConfig {
    /// Missing file means defaults.
    pub fn load(spa_root: &Path) -> Result<Self> {
        let path = spa_root.join(paths::SPA_ORCHESTRATION_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&data)?)
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct StageOutcome {
    pub stage: String,
    pub label: String,
    pub agent: String,
    pub agent_name: String,
    pub report: AgentReport,
    /// Set when the stage asks for a human to review its output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub executed: Vec<String>,
    pub stages: Vec<StageOutcome>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PromotionOutcome {
    Disabled,
    MissingMetrics { path: PathBuf },
    InvalidMetrics { path: PathBuf, reason: String },
    BelowThreshold { score: f64, threshold: i64 },
    Promoted { case_dir: PathBuf, files_copied: usize },
}

// ---------------------------------------------------------------------------
// AnkerSpa
// ---------------------------------------------------------------------------

pub struct AnkerSpa {
    spa_root: PathBuf,
    workflow: WorkflowDefinition,
    registry: BTreeMap<String, AgentConfig>,
    config: OrchestrationConfig,
}

impl AnkerSpa {
    /// Open the SPA workspace at or under `project_root`.
    pub fn open(project_root: &Path) -> Result<Self> {
        let spa_root = resolve_spa_root(project_root)?;
        let workflow = WorkflowDefinition::load(&spa_root.join(paths::SPA_WORKFLOW_FILE))?;
        let registry = load_agent_registry(&spa_root)?;
        let config = OrchestrationConfig::load(&spa_root)?;
        Ok(Self {
            spa_root,
            workflow,
            registry,
            config,
        })
    }

    pub fn spa_root(&self) -> &Path {
        &self.spa_root
    }

    pub fn config(&self) -> &OrchestrationConfig {
        &self.config
    }

    pub fn agents(&self) -> impl Iterator<Item = &AgentConfig> {
        self.registry.values()
    }

    pub fn list_stages(&self) -> Result<Vec<&StageDefinition>> {
        self.workflow.ordered_stages()
    }

    /// Execute stages in dependency order.
    ///
    /// A non-empty `only` restricts the run to stages whose key or agent id
    /// is listed.
    pub fn run(&self, force: bool, only: &[String]) -> Result<RunReport> {
        let mut queue = self.workflow.ordered_stages()?;
        if !only.is_empty() {
            queue.retain(|s| only.iter().any(|o| *o == s.key || *o == s.agent));
        }

        let mut report = RunReport {
            executed: Vec::new(),
            stages: Vec::new(),
        };
        for stage in queue {
            let config = self.registry.get(&stage.agent).ok_or_else(|| {
                SpecifyError::StageAgentNotFound {
                    stage: stage.key.clone(),
                    agent: stage.agent.clone(),
                }
            })?;
            tracing::info!(stage = %stage.key, agent = %config.id, "running stage");
            let agent = instantiate_agent(&self.spa_root, config.clone())?;
            let agent_report = agent.execute(force)?;

            let review_prompt = stage.human_review_enabled.then(|| {
                if stage.human_review_prompt.is_empty() {
                    "Manual review required".to_string()
                } else {
                    stage.human_review_prompt.clone()
                }
            });

            report.executed.push(stage.key.clone());
            report.stages.push(StageOutcome {
                stage: stage.key.clone(),
                label: stage.label.clone(),
                agent: config.id.clone(),
                agent_name: config.name.clone(),
                report: agent_report,
                review_prompt,
            });
        }
        Ok(report)
    }

    /// Copy this run's artifacts into `Practice/case-<timestamp>` when the
    /// overall score reaches the knowledge threshold.
    pub fn promote_practice(&self) -> Result<PromotionOutcome> {
        if !self.config.auto_promote_practice {
            return Ok(PromotionOutcome::Disabled);
        }

        let metrics_path = self.spa_root.join(&self.config.metrics_file);
        if !metrics_path.exists() {
            return Ok(PromotionOutcome::MissingMetrics {
                path: PathBuf::from(&self.config.metrics_file),
            });
        }

        let raw = std::fs::read_to_string(&metrics_path)?;
        let metrics: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(path = %metrics_path.display(), error = %e, "failed to parse metrics file");
                return Ok(PromotionOutcome::InvalidMetrics {
                    path: PathBuf::from(&self.config.metrics_file),
                    reason: e.to_string(),
                });
            }
        };

        let score = metrics
            .get("overall_score")
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        if score < self.config.knowledge_threshold as f64 {
            return Ok(PromotionOutcome::BelowThreshold {
                score,
                threshold: self.config.knowledge_threshold,
            });
        }

        let practice_dir = self.spa_root.join(paths::SPA_PRACTICE_DIR);
        io::ensure_dir(&practice_dir)?;
        let case_dir = unique_case_dir(&practice_dir, &chrono::Local::now());
        std::fs::create_dir_all(&case_dir)?;

        let mut files_copied = 0;
        for rel in &self.config.practice_files {
            let src = self.spa_root.join(rel);
            if !src.is_file() {
                continue;
            }
            let Some(name) = Path::new(rel).file_name() else {
                continue;
            };
            std::fs::copy(&src, case_dir.join(name))?;
            files_copied += 1;
        }

        let code_root = self.spa_root.join(&self.config.practice_code_root);
        if code_root.is_dir() {
            files_copied += io::copy_dir_all(&code_root, &case_dir.join("code-samples"))?;
        }

        let case_name = case_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        io::atomic_write(
            &case_dir.join("README.md"),
            render_practice_readme(&case_name, &metrics).as_bytes(),
        )?;

        let relative = case_dir
            .strip_prefix(&self.spa_root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| case_dir.clone());
        tracing::info!(case = %relative.display(), "practice case created");
        Ok(PromotionOutcome::Promoted {
            case_dir: relative,
            files_copied,
        })
    }
}

/// The directory itself when it is a SPA root (has `MetaData/`), otherwise
/// its `AnkerSPA/` child.
pub fn resolve_spa_root(project_root: &Path) -> Result<PathBuf> {
    if project_root.join(paths::SPA_METADATA_DIR).exists() {
        return Ok(project_root.to_path_buf());
    }
    let candidate = paths::spa_dir(project_root);
    if !candidate.exists() {
        return Err(SpecifyError::SpaNotFound(candidate));
    }
    Ok(candidate)
}

fn unique_case_dir<Tz: chrono::TimeZone>(practice_dir: &Path, now: &chrono::DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    let stamp = now.format("%Y%m%d-%H%M%S").to_string();
    let mut counter = 0u32;
    loop {
        let suffix = if counter == 0 {
            String::new()
        } else {
            format!("-{counter:02}")
        };
        let candidate = practice_dir.join(format!("case-{stamp}{suffix}"));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

fn metric(metrics: &serde_json::Value, key: &str, fallback: &str) -> String {
    match metrics.get(key) {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Null) | None => fallback.to_string(),
        Some(other) => other.to_string(),
    }
}

fn render_practice_readme(case_name: &str, metrics: &serde_json::Value) -> String {
    let lines = [
        format!("# {case_name}"),
        String::new(),
        "## Overall Scores".to_string(),
        format!("- Total Score: {}", metric(metrics, "overall_score", "n/a")),
        format!("- Requirement: {}", metric(metrics, "requirement_score", "n/a")),
        format!("- Design: {}", metric(metrics, "design_score", "n/a")),
        format!("- Code: {}", metric(metrics, "code_score", "n/a")),
        format!("- Quality: {}", metric(metrics, "quality_score", "n/a")),
        String::new(),
        "## Execution Metrics".to_string(),
        format!(
            "- Cycle Time (minutes): {}",
            metric(metrics, "cycle_time_minutes", "unknown")
        ),
        String::new(),
        "## Notes".to_string(),
        metric(metrics, "notes", "None provided"),
    ];
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
