//! Script variants and the POSIX execute-bit fixup applied after `init`.

use crate::error::SpecifyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ScriptVariant
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptVariant {
    /// POSIX shell (`.sh`)
    Sh,
    /// PowerShell (`.ps1`)
    Ps,
}

impl ScriptVariant {
    pub fn all() -> &'static [ScriptVariant] {
        &[ScriptVariant::Sh, ScriptVariant::Ps]
    }

    /// The variant matching the host operating system's convention.
    pub fn host_default() -> ScriptVariant {
        if cfg!(windows) {
            ScriptVariant::Ps
        } else {
            ScriptVariant::Sh
        }
    }

    /// An explicit choice wins; otherwise fall back to the host default.
    pub fn resolve(explicit: Option<ScriptVariant>) -> ScriptVariant {
        explicit.unwrap_or_else(ScriptVariant::host_default)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScriptVariant::Sh => "sh",
            ScriptVariant::Ps => "ps",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ScriptVariant::Sh => "sh",
            ScriptVariant::Ps => "ps1",
        }
    }

    /// Directory name of this variant's sources inside the template tree.
    pub fn template_dir(self) -> &'static str {
        match self {
            ScriptVariant::Sh => "bash",
            ScriptVariant::Ps => "powershell",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScriptVariant::Sh => "POSIX Shell (bash/zsh)",
            ScriptVariant::Ps => "PowerShell",
        }
    }
}

impl fmt::Display for ScriptVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ScriptVariant {
    type Err = SpecifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sh" | "bash" => Ok(ScriptVariant::Sh),
            "ps" | "ps1" | "powershell" => Ok(ScriptVariant::Ps),
            _ => Err(SpecifyError::UnknownScriptVariant(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Execute permissions
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Serialize)]
pub struct PermissionReport {
    pub updated: Vec<PathBuf>,
    pub failures: Vec<PermissionFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PermissionFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Add execute bits to every `*.sh` file below `scripts_dir`.
///
/// Owner execute is always set; group and other execute follow their read bits.
/// Failures are collected rather than aborting the walk.
#[cfg(unix)]
pub fn ensure_executable_scripts(scripts_dir: &Path) -> PermissionReport {
    use std::os::unix::fs::PermissionsExt;

    let mut report = PermissionReport::default();
    for path in shell_scripts(scripts_dir) {
        let outcome = (|| -> std::io::Result<bool> {
            let mode = std::fs::metadata(&path)?.permissions().mode();
            let mut new_mode = mode | 0o100;
            if mode & 0o040 != 0 {
                new_mode |= 0o010;
            }
            if mode & 0o004 != 0 {
                new_mode |= 0o001;
            }
            if new_mode == mode {
                return Ok(false);
            }
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(new_mode))?;
            Ok(true)
        })();

        match outcome {
            Ok(true) => {
                tracing::debug!(path = %path.display(), "marked script executable");
                report.updated.push(path);
            }
            Ok(false) => {}
            Err(e) => report.failures.push(PermissionFailure {
                path,
                reason: e.to_string(),
            }),
        }
    }
    report
}

/// PowerShell scripts need no permission change on Windows.
#[cfg(not(unix))]
pub fn ensure_executable_scripts(_scripts_dir: &Path) -> PermissionReport {
    PermissionReport::default()
}

#[cfg(unix)]
fn shell_scripts(dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return found;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            found.extend(shell_scripts(&path));
        } else if path.extension().is_some_and(|e| e == "sh") {
            found.push(path);
        }
    }
    found.sort();
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_variants() {
        assert_eq!("sh".parse::<ScriptVariant>().unwrap(), ScriptVariant::Sh);
        assert_eq!("ps".parse::<ScriptVariant>().unwrap(), ScriptVariant::Ps);
        assert_eq!("powershell".parse::<ScriptVariant>().unwrap(), ScriptVariant::Ps);
        assert!("zsh".parse::<ScriptVariant>().is_err());
    }

    #[test]
    fn host_default_matches_os() {
        let expected = if cfg!(windows) { "ps1" } else { "sh" };
        assert_eq!(ScriptVariant::host_default().extension(), expected);
        assert_eq!(ScriptVariant::resolve(None), ScriptVariant::host_default());
        assert_eq!(ScriptVariant::resolve(Some(ScriptVariant::Ps)), ScriptVariant::Ps);
    }

    #[cfg(unix)]
    #[test]
    fn every_shell_script_becomes_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("bash");
        std::fs::create_dir_all(&nested).unwrap();
        let script = nested.join("run.sh");
        std::fs::write(&script, "#!/usr/bin/env bash\necho hi\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o644)).unwrap();

        let sourced = dir.path().join("helpers.sh");
        std::fs::write(&sourced, "# sourced helpers\n").unwrap();
        std::fs::set_permissions(&sourced, std::fs::Permissions::from_mode(0o644)).unwrap();

        let notes = dir.path().join("notes.md");
        std::fs::write(&notes, "not a script\n").unwrap();
        std::fs::set_permissions(&notes, std::fs::Permissions::from_mode(0o644)).unwrap();

        let report = ensure_executable_scripts(dir.path());
        assert_eq!(report.updated, vec![script.clone(), sourced.clone()]);
        assert!(report.failures.is_empty());

        for path in [&script, &sourced] {
            let mode = std::fs::metadata(path).unwrap().permissions().mode() & 0o777;
            assert_eq!(mode, 0o755, "{}", path.display());
        }
        let notes_mode = std::fs::metadata(&notes).unwrap().permissions().mode() & 0o777;
        assert_eq!(notes_mode, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn owner_execute_set_even_without_group_read() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let script = dir.path().join("private.sh");
        std::fs::write(&script, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o600)).unwrap();

        ensure_executable_scripts(dir.path());
        let mode = std::fs::metadata(&script).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o700);

        let again = ensure_executable_scripts(dir.path());
        assert!(again.updated.is_empty());
    }

    #[test]
    fn missing_directory_is_empty_report() {
        let dir = TempDir::new().unwrap();
        let report = ensure_executable_scripts(&dir.path().join("nope"));
        assert!(report.updated.is_empty());
        assert!(report.failures.is_empty());
    }
}
