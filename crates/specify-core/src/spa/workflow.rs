//! Stage graph loaded from `Plan/workflow.yaml`.

use crate::error::{Result, SpecifyError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageDefinition {
    pub key: String,
    pub label: String,
    pub agent: String,
    pub depends_on: Vec<String>,
    pub outputs: Vec<String>,
    pub human_review_enabled: bool,
    pub human_review_prompt: String,
    pub final_stage: bool,
}

/// On-disk shape of one stage; every field is optional.
#[derive(Debug, Default, Deserialize)]
struct RawStage {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    agent: Option<String>,
    #[serde(default)]
    depends_on: Option<Vec<String>>,
    #[serde(default)]
    outputs: Option<Vec<String>>,
    #[serde(default)]
    human_review_enabled: Option<bool>,
    #[serde(default)]
    human_review_prompt: Option<String>,
    #[serde(default)]
    final_stage: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct WorkflowDefinition {
    pub stages: BTreeMap<String, StageDefinition>,
}

impl WorkflowDefinition {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::parse(&data)
    }

    pub fn parse(data: &str) -> Result<Self> {
        let doc: serde_yaml::Value = serde_yaml::from_str(data)?;
        let mapping = match doc {
            serde_yaml::Value::Mapping(m) => m,
            serde_yaml::Value::Null => serde_yaml::Mapping::new(),
            _ => {
                return Err(SpecifyError::InvalidWorkflow(
                    "top level must be a mapping of stages".to_string(),
                ))
            }
        };

        let mut stages = BTreeMap::new();
        for (key, value) in mapping {
            let key = match key {
                serde_yaml::Value::String(s) => s,
                other => serde_yaml::to_string(&other)?.trim_end().to_string(),
            };
            if !value.is_mapping() {
                return Err(SpecifyError::InvalidWorkflow(format!(
                    "stage {key} must be a mapping"
                )));
            }
            let raw: RawStage = serde_yaml::from_value(value).map_err(|e| {
                SpecifyError::InvalidWorkflow(format!("stage {key}: {e}"))
            })?;
            stages.insert(
                key.clone(),
                StageDefinition {
                    label: raw.label.unwrap_or_else(|| key.clone()),
                    agent: raw.agent.unwrap_or_default(),
                    depends_on: raw.depends_on.unwrap_or_default(),
                    outputs: raw.outputs.unwrap_or_default(),
                    human_review_enabled: raw.human_review_enabled.unwrap_or(false),
                    human_review_prompt: raw.human_review_prompt.unwrap_or_default(),
                    final_stage: raw.final_stage.unwrap_or(false),
                    key,
                },
            );
        }

        if stages.is_empty() {
            return Err(SpecifyError::InvalidWorkflow(
                "workflow defines no stages".to_string(),
            ));
        }

        Ok(Self { stages })
    }

    /// Stages in dependency order.
    ///
    /// Kahn's algorithm: stages with no dependencies start the queue in key
    /// order, and stages unblocked by a completed stage are appended in key
    /// order.
    pub fn ordered_stages(&self) -> Result<Vec<&StageDefinition>> {
        let mut indegree: BTreeMap<&str, usize> =
            self.stages.keys().map(|k| (k.as_str(), 0)).collect();
        let mut dependents: BTreeMap<&str, Vec<&str>> =
            self.stages.keys().map(|k| (k.as_str(), Vec::new())).collect();

        for (key, stage) in &self.stages {
            for dep in &stage.depends_on {
                let Some(list) = dependents.get_mut(dep.as_str()) else {
                    return Err(SpecifyError::InvalidWorkflow(format!(
                        "stage {key} depends on unknown stage {dep}"
                    )));
                };
                list.push(key.as_str());
                *indegree.entry(key.as_str()).or_default() += 1;
            }
        }

        // BTreeMap iteration is already sorted by key.
        let mut queue: VecDeque<&str> = indegree
            .iter()
            .filter(|(_, &d)| d == 0)
            .map(|(&k, _)| k)
            .collect();

        let mut order = Vec::with_capacity(self.stages.len());
        while let Some(current) = queue.pop_front() {
            order.push(&self.stages[current]);
            let mut next = dependents[current].clone();
            next.sort_unstable();
            for neighbour in next {
                if let Some(d) = indegree.get_mut(neighbour) {
                    *d -= 1;
                    if *d == 0 {
                        queue.push_back(neighbour);
                    }
                }
            }
        }

        if order.len() != self.stages.len() {
            return Err(SpecifyError::InvalidWorkflow(
                "cyclic stage dependencies".to_string(),
            ));
        }
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(stages: &[&StageDefinition]) -> Vec<String> {
        stages.iter().map(|s| s.key.clone()).collect()
    }

    #[test]
    fn bundled_workflow_orders_linearly() {
        let (_, yaml) = crate::spa::template::SPA_TEMPLATE_FILES
            .iter()
            .find(|(p, _)| p.ends_with("Plan/workflow.yaml"))
            .unwrap();
        let wf = WorkflowDefinition::parse(yaml).unwrap();
        let order = wf.ordered_stages().unwrap();
        assert_eq!(keys(&order), ["stage_1", "stage_2", "stage_3", "stage_4"]);
        assert!(order[3].final_stage);
        assert!(order[0].human_review_enabled);
        assert_eq!(order[2].agent, "AA3");
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let wf = WorkflowDefinition::parse("only:\n  agent: A\n").unwrap();
        let stage = &wf.stages["only"];
        assert_eq!(stage.label, "only");
        assert!(stage.depends_on.is_empty());
        assert!(!stage.human_review_enabled);
        assert!(!stage.final_stage);
    }

    #[test]
    fn independent_stages_sorted_by_key() {
        let yaml = r#"
zeta:
  agent: Z
alpha:
  agent: A
mid:
  agent: M
  depends_on: [zeta, alpha]
beta:
  agent: B
  depends_on: [alpha]
"#;
        let wf = WorkflowDefinition::parse(yaml).unwrap();
        let order = wf.ordered_stages().unwrap();
        assert_eq!(keys(&order), ["alpha", "zeta", "beta", "mid"]);
    }

    #[test]
    fn unknown_dependency_is_an_error() {
        let wf = WorkflowDefinition::parse("a:\n  depends_on: [ghost]\n").unwrap();
        let err = wf.ordered_stages().unwrap_err();
        assert!(err.to_string().contains("depends on unknown stage ghost"));
    }

    #[test]
    fn cycle_is_an_error() {
        let wf = WorkflowDefinition::parse(
            "a:\n  depends_on: [b]\nb:\n  depends_on: [a]\nc: {}\n",
        )
        .unwrap();
        let err = wf.ordered_stages().unwrap_err();
        assert!(err.to_string().contains("cyclic"));
    }

    #[test]
    fn empty_workflow_is_rejected() {
        assert!(WorkflowDefinition::parse("").is_err());
        assert!(WorkflowDefinition::parse("{}").is_err());
    }

    #[test]
    fn scalar_stage_is_rejected() {
        let err = WorkflowDefinition::parse("stage_1: nope\n").unwrap_err();
        assert!(err.to_string().contains("stage stage_1 must be a mapping"));
    }

    #[test]
    fn non_string_list_is_rejected() {
        let err = WorkflowDefinition::parse("s:\n  outputs: [[1]]\n").unwrap_err();
        assert!(err.to_string().contains("stage s"));
    }
}
