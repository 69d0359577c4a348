//! AnkerSPA: the scaffolded multi-agent workspace and its runtime.

pub mod agents;
pub mod orchestrator;
pub mod template;
pub mod workflow;

pub use agents::{instantiate_agent, load_agent_registry, ActivityAgent, AgentConfig, AgentReport};
pub use orchestrator::{
    resolve_spa_root, AnkerSpa, OrchestrationConfig, PromotionOutcome, RunReport, StageOutcome,
};
pub use template::{initialize_spa_environment, InitializationResult};
pub use workflow::{StageDefinition, WorkflowDefinition};
