#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn specify(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("specify").unwrap();
    cmd.current_dir(dir.path())
        .env("SPECIFY_ROOT", dir.path())
        .env_remove("SPEC_KIT_SRC")
        .env_remove("SPECIFY_OFFLINE");
    cmd
}

/// `specify init <name>` with every outward-facing step disabled.
fn init_offline(dir: &TempDir, name: &str) -> Command {
    let mut cmd = specify(dir);
    cmd.args([
        "init",
        name,
        "--ignore-agent-tools",
        "--no-git",
        "--offline",
    ]);
    cmd
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let out = cmd.arg("--json").assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).unwrap()
}

fn init_spa(dir: &TempDir) {
    specify(dir).args(["spa", "init"]).assert().success();
}

fn spa_root(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("AnkerSPA")
}

// ---------------------------------------------------------------------------
// specify init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_project_layout() {
    let dir = TempDir::new().unwrap();
    init_offline(&dir, "demo")
        .args(["--script", "sh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Project 'demo' ready"));

    let root = dir.path().join("demo");
    assert!(root.join(".specify/memory/constitution.md").is_file());
    assert!(root.join(".specify/templates/spec-template.md").is_file());
    assert!(root.join(".specify/templates/plan-template.md").is_file());
    assert!(root.join(".specify/templates/tasks-template.md").is_file());
    assert!(root.join(".specify/init-options.yaml").is_file());
    assert!(root.join("scripts/common.sh").is_file());
    assert!(root.join(".claude/commands/speckit.specify.md").is_file());
    assert!(root.join(".claude/commands/speckit.plan.md").is_file());
    assert!(root.join(".claude/commands/speckit.tasks.md").is_file());
    assert!(!root.join(".git").exists());
}

#[cfg(unix)]
#[test]
fn init_marks_shell_scripts_executable() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    init_offline(&dir, "demo")
        .args(["--script", "sh"])
        .assert()
        .success();

    let scripts = dir.path().join("demo/scripts");
    let mut count = 0;
    for entry in std::fs::read_dir(&scripts).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().and_then(|e| e.to_str()) != Some("sh") {
            continue;
        }
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_ne!(mode & 0o100, 0, "{} is not executable", path.display());
        count += 1;
    }
    assert!(count > 0);
}

#[test]
fn init_default_script_variant_matches_host() {
    let dir = TempDir::new().unwrap();
    init_offline(&dir, "demo").assert().success();

    let scripts = dir.path().join("demo/scripts");
    let (expected, other) = if cfg!(windows) {
        ("common.ps1", "common.sh")
    } else {
        ("common.sh", "common.ps1")
    };
    assert!(scripts.join(expected).is_file());
    assert!(!scripts.join(other).exists());
}

#[test]
fn init_powershell_variant_renders_ps_script_lines() {
    let dir = TempDir::new().unwrap();
    init_offline(&dir, "demo")
        .args(["--script", "ps", "--ai", "copilot"])
        .assert()
        .success();

    let root = dir.path().join("demo");
    assert!(root.join("scripts/setup-plan.ps1").is_file());
    let plan =
        std::fs::read_to_string(root.join(".github/prompts/speckit.plan.prompt.md")).unwrap();
    assert!(plan.contains("scripts/setup-plan.ps1"));
    assert!(!plan.contains("{SCRIPT}"));
}

#[test]
fn init_gemini_writes_toml_commands() {
    let dir = TempDir::new().unwrap();
    init_offline(&dir, "demo")
        .args(["--ai", "gemini"])
        .assert()
        .success();

    let tasks =
        std::fs::read_to_string(dir.path().join("demo/.gemini/commands/speckit.tasks.toml"))
            .unwrap();
    assert!(tasks.contains("prompt = \"\"\""));
    assert!(tasks.contains("{{args}}"));
}

#[test]
fn init_rejects_existing_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("demo")).unwrap();
    init_offline(&dir, "demo")
        .assert()
        .failure()
        .stderr(predicate::str::contains("directory already exists"));
}

#[test]
fn init_rejects_invalid_project_name() {
    let dir = TempDir::new().unwrap();
    init_offline(&dir, "bad/name")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid project name"));
}

#[test]
fn init_rejects_unknown_agent() {
    let dir = TempDir::new().unwrap();
    init_offline(&dir, "demo")
        .args(["--ai", "notepad"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown AI agent 'notepad'"));
}

#[test]
fn init_here_refuses_non_empty_directory_without_force() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("README.md"), "# existing\n").unwrap();

    specify(&dir)
        .args(["init", "--here", "--ignore-agent-tools", "--no-git", "--offline"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("directory is not empty"));
    assert!(!dir.path().join(".specify").exists());

    specify(&dir)
        .args([
            "init",
            "--here",
            "--force",
            "--ignore-agent-tools",
            "--no-git",
            "--offline",
        ])
        .assert()
        .success();
    assert!(dir.path().join(".specify/memory/constitution.md").is_file());
    assert_eq!(
        std::fs::read_to_string(dir.path().join("README.md")).unwrap(),
        "# existing\n"
    );
}

#[test]
fn init_dot_initializes_current_directory() {
    let dir = TempDir::new().unwrap();
    init_offline(&dir, ".").assert().success();
    assert!(dir.path().join(".specify/init-options.yaml").is_file());
}

#[test]
fn init_requires_agent_cli_unless_ignored() {
    let dir = TempDir::new().unwrap();
    let empty_path = TempDir::new().unwrap();

    specify(&dir)
        .env("PATH", empty_path.path())
        .env("HOME", empty_path.path())
        .args(["init", "demo", "--ai", "claude", "--no-git", "--offline"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("claude not found"))
        .stderr(predicate::str::contains("--ignore-agent-tools"));
    assert!(!dir.path().join("demo").exists());
}

#[test]
fn init_json_reports_choices() {
    let dir = TempDir::new().unwrap();
    let value = stdout_json(init_offline(&dir, "demo").args(["--script", "sh"]));

    assert_eq!(value["project"]["project"], "demo");
    assert_eq!(value["project"]["ai"], "claude");
    assert_eq!(value["project"]["script"], "sh");
    assert_eq!(value["project"]["git"]["status"], "skipped");
    assert_eq!(value["release"]["status"], "skipped");
}

#[test]
fn init_records_options() {
    let dir = TempDir::new().unwrap();
    init_offline(&dir, "demo")
        .args(["--ai", "qwen", "--script", "sh", "--spa"])
        .assert()
        .success();

    let raw = std::fs::read_to_string(dir.path().join("demo/.specify/init-options.yaml")).unwrap();
    let opts: serde_yaml::Value = serde_yaml::from_str(&raw).unwrap();
    assert_eq!(opts["project"].as_str(), Some("demo"));
    assert_eq!(opts["ai"].as_str(), Some("qwen"));
    assert_eq!(opts["script"].as_str(), Some("sh"));
    assert_eq!(opts["spa"].as_bool(), Some(true));
    assert!(dir.path().join("demo/AnkerSPA/Plan/workflow.yaml").is_file());
}

#[test]
fn init_uses_template_overlay() {
    let dir = TempDir::new().unwrap();
    let src = TempDir::new().unwrap();
    let docs = src.path().join("templates/documents");
    std::fs::create_dir_all(&docs).unwrap();
    std::fs::write(docs.join("spec-template.md"), "# Team spec template\n").unwrap();

    init_offline(&dir, "demo")
        .env("SPEC_KIT_SRC", src.path())
        .assert()
        .success();

    let spec =
        std::fs::read_to_string(dir.path().join("demo/.specify/templates/spec-template.md"))
            .unwrap();
    assert_eq!(spec, "# Team spec template\n");
}

// ---------------------------------------------------------------------------
// specify check
// ---------------------------------------------------------------------------

#[test]
fn check_succeeds_even_when_tools_are_missing() {
    let dir = TempDir::new().unwrap();
    let empty_path = TempDir::new().unwrap();
    specify(&dir)
        .env("PATH", empty_path.path())
        .env("HOME", empty_path.path())
        .args(["check", "--offline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("missing"))
        .stdout(predicate::str::contains("specify is ready to use"));
}

#[test]
fn check_json_lists_tools() {
    let dir = TempDir::new().unwrap();
    let value = stdout_json(specify(&dir).args(["check", "--offline"]));

    let tools = value["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
    assert!(names.contains(&"git"));
    assert!(names.contains(&"claude"));
    assert!(names.contains(&"code"));
    assert_eq!(value["release"]["status"], "skipped");
}

// ---------------------------------------------------------------------------
// specify spa
// ---------------------------------------------------------------------------

#[test]
fn spa_init_creates_workspace_and_keeps_edits() {
    let dir = TempDir::new().unwrap();
    init_spa(&dir);

    let requirement = spa_root(&dir).join("Input/requirement.md");
    assert!(requirement.is_file());
    assert!(spa_root(&dir).join("AA/AA1-RequirementAnalyzer/metadata.yaml").is_file());

    std::fs::write(&requirement, "# Our requirement\n").unwrap();
    specify(&dir)
        .args(["spa", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));
    assert_eq!(
        std::fs::read_to_string(&requirement).unwrap(),
        "# Our requirement\n"
    );

    specify(&dir).args(["spa", "init", "--force"]).assert().success();
    assert_ne!(
        std::fs::read_to_string(&requirement).unwrap(),
        "# Our requirement\n"
    );
}

#[test]
fn spa_commands_fail_without_workspace() {
    let dir = TempDir::new().unwrap();
    specify(&dir)
        .args(["spa", "stages"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("AnkerSPA directory not found"));
}

#[test]
fn spa_agents_lists_registry() {
    let dir = TempDir::new().unwrap();
    init_spa(&dir);
    let value = stdout_json(specify(&dir).args(["spa", "agents"]));
    let ids: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|a| a["id"].as_str())
        .collect();
    assert_eq!(ids, ["AA1", "AA2", "AA3", "AA4"]);
}

#[test]
fn spa_stages_are_ordered() {
    let dir = TempDir::new().unwrap();
    init_spa(&dir);
    let value = stdout_json(specify(&dir).args(["spa", "stages"]));
    let keys: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s["key"].as_str())
        .collect();
    assert_eq!(keys, ["stage_1", "stage_2", "stage_3", "stage_4"]);
}

#[test]
fn spa_run_executes_all_stages() {
    let dir = TempDir::new().unwrap();
    init_spa(&dir);

    specify(&dir)
        .args(["spa", "run"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Executed stages: stage_1, stage_2, stage_3, stage_4",
        ))
        .stdout(predicate::str::contains(
            "review: Confirm the requirement specification is accurate",
        ));

    let root = spa_root(&dir);
    assert!(root.join("Output/requirement/requirement-spec.json").is_file());
    assert!(root.join("Output/design/technical-design.md").is_file());
    assert!(root.join("Output/code/app/api/routes.py").is_file());
    assert!(root.join("Output/reports/quality-report.md").is_file());
}

#[test]
fn spa_run_filters_stages() {
    let dir = TempDir::new().unwrap();
    init_spa(&dir);

    let value = stdout_json(specify(&dir).args(["spa", "run", "--stage", "AA1"]));
    assert_eq!(value["executed"], serde_json::json!(["stage_1"]));
    assert!(!spa_root(&dir).join("Output/design/technical-design.md").exists());
}

#[test]
fn spa_run_reports_missing_inputs() {
    let dir = TempDir::new().unwrap();
    init_spa(&dir);
    specify(&dir)
        .args(["spa", "run", "--stage", "stage_2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required inputs for AA2"));
}

#[test]
fn spa_rerun_without_force_keeps_edits() {
    let dir = TempDir::new().unwrap();
    init_spa(&dir);
    specify(&dir).args(["spa", "run"]).assert().success();

    let design = spa_root(&dir).join("Output/design/technical-design.md");
    std::fs::write(&design, "edited").unwrap();
    specify(&dir).args(["spa", "run"]).assert().success();
    assert_eq!(std::fs::read_to_string(&design).unwrap(), "edited");
}

fn write_metrics(dir: &TempDir, body: &str) {
    std::fs::write(
        spa_root(dir).join("Output/reports/execution-metrics.json"),
        body,
    )
    .unwrap();
}

fn practice_cases(root: &Path) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(root.join("Practice"))
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("case-"))
        })
        .collect()
}

#[test]
fn spa_promote_skips_low_scores() {
    let dir = TempDir::new().unwrap();
    init_spa(&dir);
    specify(&dir)
        .args(["spa", "promote"])
        .assert()
        .success()
        .stdout(predicate::str::contains("below the knowledge threshold 80"));
    assert!(practice_cases(&spa_root(&dir)).is_empty());
}

#[test]
fn spa_promote_creates_practice_case() {
    let dir = TempDir::new().unwrap();
    init_spa(&dir);
    specify(&dir).args(["spa", "run"]).assert().success();
    write_metrics(
        &dir,
        r#"{"overall_score": 92, "code_score": 90, "cycle_time_minutes": 45}"#,
    );

    let value = stdout_json(specify(&dir).args(["spa", "promote"]));
    assert_eq!(value["status"], "promoted");

    let cases = practice_cases(&spa_root(&dir));
    assert_eq!(cases.len(), 1);
    let case = &cases[0];
    assert!(case.join("technical-design.md").is_file());
    assert!(case.join("code-samples/README.md").is_file());
    let readme = std::fs::read_to_string(case.join("README.md")).unwrap();
    assert!(readme.contains("- Total Score: 92"));
    assert!(readme.contains("- Cycle Time (minutes): 45"));
    assert!(readme.contains("None provided"));
}

#[test]
fn spa_promote_tolerates_invalid_metrics() {
    let dir = TempDir::new().unwrap();
    init_spa(&dir);
    write_metrics(&dir, "not json");
    specify(&dir)
        .args(["spa", "promote"])
        .assert()
        .success()
        .stdout(predicate::str::contains("warning: could not parse"));
}
