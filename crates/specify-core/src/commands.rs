//! Rendering of slash-command templates into agent-specific command files.

use crate::assistant::{AiAgent, CommandFormat};
use crate::error::{Result, SpecifyError};
use crate::scripts::ScriptVariant;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct CommandScripts {
    pub sh: String,
    pub ps: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandFrontMatter {
    pub description: String,
    pub scripts: Option<CommandScripts>,
}

/// A command template split into its front matter and body.
#[derive(Debug, Clone)]
pub struct CommandTemplate {
    pub name: String,
    pub front_matter: CommandFrontMatter,
    pub body: String,
}

impl CommandTemplate {
    pub fn parse(name: &str, source: &str) -> Result<Self> {
        let invalid = |reason: &str| SpecifyError::InvalidCommandTemplate {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let rest = source
            .strip_prefix("---\n")
            .or_else(|| source.strip_prefix("---\r\n"))
            .ok_or_else(|| invalid("missing front matter"))?;
        let end = rest
            .find("\n---")
            .ok_or_else(|| invalid("unterminated front matter"))?;
        let yaml = &rest[..end];
        let after = &rest[end + "\n---".len()..];
        let body = after.trim_start_matches(['\r', '\n']).to_string();

        let front_matter: CommandFrontMatter =
            serde_yaml::from_str(yaml).map_err(|e| invalid(&e.to_string()))?;

        Ok(Self {
            name: name.to_string(),
            front_matter,
            body,
        })
    }

    /// Script invocation line for `variant`, with `{ARGS}` expanded.
    pub fn script_line(&self, variant: ScriptVariant, agent: AiAgent) -> Option<String> {
        self.front_matter.scripts.as_ref().map(|s| {
            let raw = match variant {
                ScriptVariant::Sh => &s.sh,
                ScriptVariant::Ps => &s.ps,
            };
            raw.replace("{ARGS}", agent.args_placeholder())
        })
    }

    /// Produce the final file content for `agent`.
    pub fn render(&self, agent: AiAgent, variant: ScriptVariant) -> Result<String> {
        let script = self.script_line(variant, agent).unwrap_or_default();
        let body = self
            .body
            .replace("{SCRIPT}", &script)
            .replace("{ARGS}", agent.args_placeholder())
            .replace("$ARGUMENTS", agent.args_placeholder())
            .replace("__AGENT__", agent.as_str());

        match agent.command_format() {
            CommandFormat::Markdown => markdown_command(&self.front_matter.description, &body),
            CommandFormat::Toml => Ok(toml_command(&self.front_matter.description, &body)),
        }
    }
}

#[derive(Serialize)]
struct MarkdownFrontMatter<'a> {
    description: &'a str,
}

fn markdown_command(description: &str, body: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(&MarkdownFrontMatter { description })?;
    Ok(format!("---\n{yaml}---\n\n{body}"))
}

fn toml_command(description: &str, prompt: &str) -> String {
    let description = description.replace('\\', "\\\\").replace('"', "\\\"");
    let prompt = prompt
        .replace('\\', "\\\\")
        .replace("\"\"\"", "\\\"\\\"\\\"");
    format!(
        r#"description = "{description}"

prompt = """
{prompt}
"""
"#
    )
}
