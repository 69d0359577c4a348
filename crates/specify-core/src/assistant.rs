//! Catalogue of AI coding assistants a project can be scaffolded for.

use crate::error::SpecifyError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiAgent {
    Claude,
    Gemini,
    Copilot,
    Cursor,
    Qwen,
    Opencode,
    Codex,
    Windsurf,
}

/// On-disk format of the generated slash-command files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandFormat {
    Markdown,
    Toml,
}

impl AiAgent {
    pub fn all() -> &'static [AiAgent] {
        &[
            AiAgent::Claude,
            AiAgent::Gemini,
            AiAgent::Copilot,
            AiAgent::Cursor,
            AiAgent::Qwen,
            AiAgent::Opencode,
            AiAgent::Codex,
            AiAgent::Windsurf,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AiAgent::Claude => "claude",
            AiAgent::Gemini => "gemini",
            AiAgent::Copilot => "copilot",
            AiAgent::Cursor => "cursor",
            AiAgent::Qwen => "qwen",
            AiAgent::Opencode => "opencode",
            AiAgent::Codex => "codex",
            AiAgent::Windsurf => "windsurf",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            AiAgent::Claude => "Claude Code",
            AiAgent::Gemini => "Gemini CLI",
            AiAgent::Copilot => "GitHub Copilot",
            AiAgent::Cursor => "Cursor",
            AiAgent::Qwen => "Qwen Code",
            AiAgent::Opencode => "opencode",
            AiAgent::Codex => "Codex CLI",
            AiAgent::Windsurf => "Windsurf",
        }
    }

    /// Project-relative directory the command files are written to.
    pub fn commands_dir(self) -> &'static str {
        match self {
            AiAgent::Claude => ".claude/commands",
            AiAgent::Gemini => ".gemini/commands",
            AiAgent::Copilot => ".github/prompts",
            AiAgent::Cursor => ".cursor/commands",
            AiAgent::Qwen => ".qwen/commands",
            AiAgent::Opencode => ".opencode/command",
            AiAgent::Codex => ".codex/prompts",
            AiAgent::Windsurf => ".windsurf/workflows",
        }
    }

    pub fn command_format(self) -> CommandFormat {
        match self {
            AiAgent::Gemini | AiAgent::Qwen => CommandFormat::Toml,
            _ => CommandFormat::Markdown,
        }
    }

    /// Placeholder the agent expands to the user's command arguments.
    pub fn args_placeholder(self) -> &'static str {
        match self.command_format() {
            CommandFormat::Toml => "{{args}}",
            CommandFormat::Markdown => "$ARGUMENTS",
        }
    }

    /// File name of a generated command, e.g. `speckit.plan.md`.
    pub fn command_file_name(self, command: &str) -> String {
        match (self, self.command_format()) {
            (AiAgent::Copilot, _) => format!("speckit.{command}.prompt.md"),
            (_, CommandFormat::Toml) => format!("speckit.{command}.toml"),
            (_, CommandFormat::Markdown) => format!("speckit.{command}.md"),
        }
    }

    /// Executable that must be on PATH for this agent, if it is CLI based.
    /// IDE-based agents return None.
    pub fn cli_tool(self) -> Option<&'static str> {
        match self {
            AiAgent::Claude => Some("claude"),
            AiAgent::Gemini => Some("gemini"),
            AiAgent::Cursor => Some("cursor-agent"),
            AiAgent::Qwen => Some("qwen"),
            AiAgent::Opencode => Some("opencode"),
            AiAgent::Codex => Some("codex"),
            AiAgent::Copilot | AiAgent::Windsurf => None,
        }
    }

    pub fn install_hint(self) -> &'static str {
        match self {
            AiAgent::Claude => "https://docs.anthropic.com/en/docs/claude-code/setup",
            AiAgent::Gemini => "https://github.com/google-gemini/gemini-cli",
            AiAgent::Cursor => "https://cursor.com/cli",
            AiAgent::Qwen => "https://github.com/QwenLM/qwen-code",
            AiAgent::Opencode => "https://opencode.ai",
            AiAgent::Codex => "https://github.com/openai/codex",
            AiAgent::Copilot | AiAgent::Windsurf => "no CLI required",
        }
    }
}

impl fmt::Display for AiAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AiAgent {
    type Err = SpecifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AiAgent::all()
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| SpecifyError::UnknownAgent(s.to_string()))
    }
}
