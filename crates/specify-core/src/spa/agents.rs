//! Activity Agents: the registry loaded from `AA/*/metadata.yaml` and the
//! four agent kinds that write stage artifacts.

use crate::error::{Result, SpecifyError};
use crate::io;
use crate::paths;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// AgentConfig / registry
// ---------------------------------------------------------------------------

/// In-memory form of an agent's `metadata.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentConfig {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub version: String,
    pub description: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub root: PathBuf,
}

impl AgentConfig {
    pub fn metadata_path(&self) -> PathBuf {
        self.root.join(paths::AGENT_METADATA_FILE)
    }

    pub fn prompt_path(&self) -> PathBuf {
        self.root.join(paths::AGENT_PROMPT_FILE)
    }

    pub fn checklist_path(&self) -> PathBuf {
        self.root.join(paths::AGENT_CHECKLIST_FILE)
    }

    fn from_metadata(path: &Path, root: PathBuf) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let value: serde_yaml::Value = serde_yaml::from_str(&data)?;

        let id = value
            .get("id")
            .filter(|v| !v.is_null())
            .map(scalar_to_string)
            .ok_or_else(|| SpecifyError::AgentMetadataMissing {
                field: "id".to_string(),
                path: path.to_path_buf(),
            })?;

        let text = |key: &str, default: &str| {
            value
                .get(key)
                .filter(|v| !v.is_null())
                .map(scalar_to_string)
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            name: text("name", &id),
            kind: text("kind", ""),
            version: text("version", "0.0.0"),
            description: text("description", ""),
            inputs: string_list(value.get("inputs"), "inputs", &id)?,
            outputs: string_list(value.get("outputs"), "outputs", &id)?,
            id,
            root,
        })
    }
}

fn scalar_to_string(v: &serde_yaml::Value) -> String {
    match v {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn string_list(raw: Option<&serde_yaml::Value>, field: &str, agent: &str) -> Result<Vec<String>> {
    let invalid = || SpecifyError::AgentMetadataField {
        agent: agent.to_string(),
        field: field.to_string(),
    };
    match raw {
        None | Some(serde_yaml::Value::Null) => Ok(Vec::new()),
        Some(serde_yaml::Value::Sequence(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
            .collect(),
        Some(_) => Err(invalid()),
    }
}

/// Load every agent under `<spa_root>/AA`, keyed by agent id.
///
/// Subdirectories are visited in sorted order; ones without a
/// `metadata.yaml` are ignored. A missing `AA/` directory yields an empty
/// registry.
pub fn load_agent_registry(spa_root: &Path) -> Result<BTreeMap<String, AgentConfig>> {
    let mut registry = BTreeMap::new();
    let aa_root = spa_root.join(paths::SPA_AGENTS_DIR);
    if !aa_root.is_dir() {
        return Ok(registry);
    }

    let mut subdirs: Vec<PathBuf> = std::fs::read_dir(&aa_root)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    subdirs.sort();

    for subdir in subdirs {
        let metadata = subdir.join(paths::AGENT_METADATA_FILE);
        if !metadata.exists() {
            continue;
        }
        let config = AgentConfig::from_metadata(&metadata, subdir)?;
        registry.insert(config.id.clone(), config);
    }

    Ok(registry)
}

// ---------------------------------------------------------------------------
// AgentKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Requirement,
    TechnicalDesign,
    CodeGeneration,
    Quality,
}

impl AgentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Requirement => "requirement",
            AgentKind::TechnicalDesign => "technical-design",
            AgentKind::CodeGeneration => "code-generation",
            AgentKind::Quality => "quality",
        }
    }

    pub fn parse(kind: &str) -> Option<AgentKind> {
        match kind {
            "requirement" => Some(AgentKind::Requirement),
            "technical-design" => Some(AgentKind::TechnicalDesign),
            "code-generation" => Some(AgentKind::CodeGeneration),
            "quality" => Some(AgentKind::Quality),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ActivityAgent
// ---------------------------------------------------------------------------

/// What an agent did when executed.
#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    pub agent: String,
    pub written: Vec<PathBuf>,
    pub kept: Vec<PathBuf>,
    pub message: String,
}

impl AgentReport {
    pub fn wrote_any(&self) -> bool {
        !self.written.is_empty()
    }
}

/// Collects per-file write outcomes relative to the SPA root.
struct Artifacts<'a> {
    spa_root: &'a Path,
    force: bool,
    written: Vec<PathBuf>,
    kept: Vec<PathBuf>,
}

impl<'a> Artifacts<'a> {
    fn new(spa_root: &'a Path, force: bool) -> Self {
        Self {
            spa_root,
            force,
            written: Vec::new(),
            kept: Vec::new(),
        }
    }

    fn record(&mut self, rel: &str, written: bool) {
        if written {
            self.written.push(PathBuf::from(rel));
        } else {
            self.kept.push(PathBuf::from(rel));
        }
    }

    fn text(&mut self, rel: &str, content: &str) -> Result<()> {
        let written = io::write_file(&self.spa_root.join(rel), content.as_bytes(), self.force)?;
        self.record(rel, written);
        Ok(())
    }

    fn json(&mut self, rel: &str, value: &serde_json::Value) -> Result<()> {
        let written = io::write_json(&self.spa_root.join(rel), value, self.force)?;
        self.record(rel, written);
        Ok(())
    }

    fn finish(self, agent: &str, created: &str, existing: &str) -> AgentReport {
        let message = if self.written.is_empty() {
            existing.to_string()
        } else {
            created.to_string()
        };
        AgentReport {
            agent: agent.to_string(),
            written: self.written,
            kept: self.kept,
            message,
        }
    }
}

pub trait ActivityAgent {
    fn config(&self) -> &AgentConfig;
    fn spa_root(&self) -> &Path;

    /// Write this agent's artifacts. Existing ones are kept unless `force`.
    fn produce(&self, force: bool) -> Result<AgentReport>;

    fn output_paths(&self) -> Vec<PathBuf> {
        self.config()
            .outputs
            .iter()
            .map(|p| self.spa_root().join(p))
            .collect()
    }

    fn ensure_inputs(&self) -> Result<()> {
        let missing: Vec<&str> = self
            .config()
            .inputs
            .iter()
            .filter(|rel| !self.spa_root().join(rel).exists())
            .map(String::as_str)
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        Err(SpecifyError::MissingInputs {
            agent: self.config().id.clone(),
            missing: missing.join(", "),
        })
    }

    fn prepare_output_directories(&self) -> Result<()> {
        for path in self.output_paths() {
            if let Some(parent) = path.parent() {
                io::ensure_dir(parent)?;
            }
        }
        Ok(())
    }

    fn outputs_ready(&self) -> bool {
        self.output_paths().iter().all(|p| p.exists())
    }

    fn execute(&self, force: bool) -> Result<AgentReport> {
        self.ensure_inputs()?;
        self.prepare_output_directories()?;
        let report = self.produce(force)?;
        tracing::info!(agent = %self.config().id, written = report.written.len(), "{}", report.message);
        Ok(report)
    }
}

macro_rules! activity_agent {
    ($name:ident) => {
        pub struct $name {
            spa_root: PathBuf,
            config: AgentConfig,
        }

        impl $name {
            pub fn new(spa_root: &Path, config: AgentConfig) -> Self {
                Self {
                    spa_root: spa_root.to_path_buf(),
                    config,
                }
            }
        }
    };
}

activity_agent!(RequirementAnalyzer);
activity_agent!(TechnicalDesigner);
activity_agent!(CodeGenerator);
activity_agent!(QualityChecker);

impl ActivityAgent for RequirementAnalyzer {
    fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn spa_root(&self) -> &Path {
        &self.spa_root
    }

    fn produce(&self, force: bool) -> Result<AgentReport> {
        let mut out = Artifacts::new(&self.spa_root, force);
        out.json(
            "Output/requirement/requirement-spec.json",
            &json!({
                "summary": "",
                "functional_requirements": [],
                "non_functional_requirements": [],
                "api_requirements": [],
                "data_requirements": [],
                "assumptions": [],
            }),
        )?;
        out.text(
            "Output/requirement/clarification-questions.md",
            CLARIFICATION_TEMPLATE,
        )?;
        Ok(out.finish(
            &self.config.id,
            "Generated requirement skeleton and clarification template",
            "Outputs already exist, rerun with --force to regenerate",
        ))
    }
}

impl ActivityAgent for TechnicalDesigner {
    fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn spa_root(&self) -> &Path {
        &self.spa_root
    }

    fn produce(&self, force: bool) -> Result<AgentReport> {
        let mut out = Artifacts::new(&self.spa_root, force);
        out.text("Output/design/technical-design.md", TECHNICAL_DESIGN_TEMPLATE)?;
        out.text("Output/design/api-spec.yaml", API_SPEC_TEMPLATE)?;
        out.json(
            "Output/design/data-model.json",
            &json!({
                "entities": [],
                "relationships": [],
                "indexes": [],
            }),
        )?;
        Ok(out.finish(
            &self.config.id,
            "Generated technical design skeleton; ready for refinement",
            "Design outputs already exist; use --force to overwrite",
        ))
    }
}

impl ActivityAgent for CodeGenerator {
    fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn spa_root(&self) -> &Path {
        &self.spa_root
    }

    fn produce(&self, force: bool) -> Result<AgentReport> {
        let mut out = Artifacts::new(&self.spa_root, force);
        for (rel, content) in CODE_SKELETON {
            out.text(&format!("Output/code/{rel}"), content)?;
        }
        Ok(out.finish(
            &self.config.id,
            "Code skeleton files prepared",
            "Code skeleton already exists; use --force to regenerate",
        ))
    }
}

impl ActivityAgent for QualityChecker {
    fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn spa_root(&self) -> &Path {
        &self.spa_root
    }

    fn produce(&self, force: bool) -> Result<AgentReport> {
        let mut out = Artifacts::new(&self.spa_root, force);
        out.text("Output/reports/quality-report.md", QUALITY_REPORT_TEMPLATE)?;
        out.json(
            "Output/reports/execution-metrics.json",
            &json!({
                "overall_score": 0,
                "requirement_score": 0,
                "design_score": 0,
                "code_score": 0,
                "quality_score": 0,
                "cycle_time_minutes": 0,
                "notes": "Update after manual review with justification for knowledge retention",
            }),
        )?;
        Ok(out.finish(
            &self.config.id,
            "Quality report and metrics templates ready",
            "Quality outputs already exist; use --force to regenerate",
        ))
    }
}

/// Build the agent implementation matching `config.kind`.
pub fn instantiate_agent(spa_root: &Path, config: AgentConfig) -> Result<Box<dyn ActivityAgent>> {
    let kind = AgentKind::parse(&config.kind).ok_or_else(|| SpecifyError::UnknownAgentKind {
        kind: config.kind.clone(),
        agent: config.id.clone(),
    })?;
    let agent: Box<dyn ActivityAgent> = match kind {
        AgentKind::Requirement => Box::new(RequirementAnalyzer::new(spa_root, config)),
        AgentKind::TechnicalDesign => Box::new(TechnicalDesigner::new(spa_root, config)),
        AgentKind::CodeGeneration => Box::new(CodeGenerator::new(spa_root, config)),
        AgentKind::Quality => Box::new(QualityChecker::new(spa_root, config)),
    };
    Ok(agent)
}

// ---------------------------------------------------------------------------
// Artifact templates
// ---------------------------------------------------------------------------

const CLARIFICATION_TEMPLATE: &str = r#"# Clarification Checklist

- [ ] Question 1:
- [ ] Question 2:

> Update with answers after AA1 completes.
"#;

const TECHNICAL_DESIGN_TEMPLATE: &str = r#"# Technical Design

## Architecture Overview
TODO: Describe the overall architecture, core components, and interactions.

## Module Responsibilities
- Module A:
- Module B:

## Technology Choices
- Backend:
- Database:

## Risks and Mitigations
- Risk:
- Mitigation:
"#;

const API_SPEC_TEMPLATE: &str = r#"openapi: 3.0.3
info:
  title: TBD
  version: 0.1.0
servers:
  - url: http://localhost:8000
paths: {}
components:
  schemas: {}
"#;

const QUALITY_REPORT_TEMPLATE: &str = r#"# Quality Report

## Overall Assessment
- Score:
- Summary:

## Highlights
- 

## Recommendations
- 

## Risks
- 
"#;

/// `(path under Output/code, content)`
const CODE_SKELETON: &[(&str, &str)] = &[
    ("app/__init__.py", "\n"),
    ("app/api/__init__.py", "\n"),
    (
        "app/api/routes.py",
        r#"from fastapi import APIRouter

router = APIRouter()


@router.get("/health", summary="Health check")
async def read_health():
    """Simple health check endpoint."""
    return {"status": "ok"}
"#,
    ),
    ("app/services/__init__.py", "\n"),
    ("app/repositories/__init__.py", "\n"),
    ("app/models/__init__.py", "\n"),
    ("tests/__init__.py", "\n"),
    (
        "tests/test_placeholder.py",
        "def test_placeholder():\n    assert True\n",
    ),
    (
        "docs/README.md",
        "# Code Guidelines\n\nAdd usage examples and design decisions based on the business scenario.\n",
    ),
];
