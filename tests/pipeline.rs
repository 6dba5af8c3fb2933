//! End-to-end pipeline tests against real subprocesses.
//!
//! Commands are plain `touch`/`false` invocations so each test can
//! assert exactly which phases ran by looking at marker files in a
//! scratch working directory.

use std::sync::{Mutex, OnceLock};

use cdk_pipe::commands::CommandSet;
use cdk_pipe::variables::Settings;
use cdk_pipe::{config, pipeline};
use tempfile::TempDir;

// The runner switches the process cwd; pipeline tests serialize on it.
fn cwd_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

fn settings(dir: &TempDir) -> Settings {
    Settings {
        working_dir: dir.path().to_str().unwrap().to_string(),
        debug: false,
        bootstrap: false,
        synth: false,
        diff: false,
        deploy: true,
        lint: true,
        format: true,
        before_script: None,
        after_script: None,
        extra_args: None,
        extra_args_diff: None,
        extra_args_synth: None,
        extra_args_bootstrap: None,
        lint_command: None,
        format_command: None,
        config_path: None,
    }
}

fn command_set() -> CommandSet {
    CommandSet {
        install: "touch install.txt".to_string(),
        bootstrap: "touch bootstrap.txt".to_string(),
        deploy: "touch deploy.txt".to_string(),
        diff: "touch diff.txt".to_string(),
        synth: "touch synth.txt".to_string(),
        lint: None,
        format: None,
        before_scripts: None,
        after_scripts: None,
    }
}

fn ran(dir: &TempDir, marker: &str) -> bool {
    dir.path().join(marker).exists()
}

#[test]
fn deploy_only_runs_exactly_install_and_deploy() {
    let _lock = cwd_lock().lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let mut commands = command_set();
    commands.before_scripts = Some(vec!["touch before.txt".to_string()]);
    commands.after_scripts = Some(vec!["touch after.txt".to_string()]);

    pipeline::run(&settings(&dir), &commands).unwrap();

    assert!(ran(&dir, "before.txt"));
    assert!(ran(&dir, "install.txt"));
    assert!(ran(&dir, "deploy.txt"));
    assert!(ran(&dir, "after.txt"));
    assert!(!ran(&dir, "bootstrap.txt"));
    assert!(!ran(&dir, "diff.txt"));
    assert!(!ran(&dir, "synth.txt"));
}

#[test]
fn enabled_phases_all_run() {
    let _lock = cwd_lock().lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let mut settings = settings(&dir);
    settings.bootstrap = true;
    settings.diff = true;
    settings.synth = true;

    pipeline::run(&settings, &command_set()).unwrap();

    assert!(ran(&dir, "bootstrap.txt"));
    assert!(ran(&dir, "deploy.txt"));
    assert!(ran(&dir, "diff.txt"));
    assert!(ran(&dir, "synth.txt"));
}

#[test]
fn before_script_failure_prevents_all_later_phases() {
    let _lock = cwd_lock().lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let mut commands = command_set();
    commands.before_scripts = Some(vec!["false".to_string()]);

    let err = pipeline::run(&settings(&dir), &commands).unwrap_err();

    assert!(err.to_string().starts_with("before script:"));
    assert!(!ran(&dir, "install.txt"));
    assert!(!ran(&dir, "deploy.txt"));
}

#[test]
fn after_script_failure_reports_once_deploy_completed() {
    let _lock = cwd_lock().lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let mut commands = command_set();
    commands.after_scripts = Some(vec!["false".to_string()]);

    let err = pipeline::run(&settings(&dir), &commands).unwrap_err();

    assert!(err.to_string().starts_with("after script:"));
    assert!(ran(&dir, "deploy.txt"));
}

#[test]
fn bootstrap_failure_is_fatal() {
    let _lock = cwd_lock().lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let mut settings = settings(&dir);
    settings.bootstrap = true;
    let mut commands = command_set();
    commands.bootstrap = "false".to_string();

    let err = pipeline::run(&settings, &commands).unwrap_err();

    assert!(err.to_string().starts_with("cdk bootstrap:"));
    assert!(!ran(&dir, "deploy.txt"));
}

#[test]
fn lint_override_runs_without_static_command() {
    let _lock = cwd_lock().lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let mut settings = settings(&dir);
    settings.lint_command = Some("touch lint.txt".to_string());

    pipeline::run(&settings, &command_set()).unwrap();

    assert!(ran(&dir, "lint.txt"));
}

#[test]
fn lint_flag_disables_configured_check() {
    let _lock = cwd_lock().lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let mut settings = settings(&dir);
    settings.lint = false;
    let mut commands = command_set();
    commands.lint = Some("false".to_string());

    pipeline::run(&settings, &commands).unwrap();
}

#[test]
fn failing_format_check_stops_the_run() {
    let _lock = cwd_lock().lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let mut commands = command_set();
    commands.format = Some("false".to_string());

    let err = pipeline::run(&settings(&dir), &commands).unwrap_err();

    assert!(err.to_string().starts_with("format check:"));
    assert!(!ran(&dir, "deploy.txt"));
}

#[test]
fn extra_args_extend_the_deploy_command() {
    let _lock = cwd_lock().lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let mut settings = settings(&dir);
    settings.extra_args = Some("deploy-extended.txt".to_string());
    let mut commands = command_set();
    commands.deploy = "touch".to_string();

    pipeline::run(&settings, &commands).unwrap();

    assert!(ran(&dir, "deploy-extended.txt"));
}

#[test]
fn runtime_script_splits_on_semicolons() {
    let _lock = cwd_lock().lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let mut settings = settings(&dir);
    settings.after_script = Some("touch a.txt; touch b.txt".to_string());

    pipeline::run(&settings, &command_set()).unwrap();

    assert!(ran(&dir, "a.txt"));
    assert!(ran(&dir, "b.txt"));
}

#[test]
fn runtime_script_failure_stops_the_split_batch() {
    let _lock = cwd_lock().lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let mut settings = settings(&dir);
    settings.before_script = Some("false; touch never.txt".to_string());

    let err = pipeline::run(&settings, &command_set()).unwrap_err();

    assert!(err.to_string().starts_with("before script:"));
    assert!(!ran(&dir, "never.txt"));
}

#[test]
fn static_scripts_run_before_runtime_script() {
    let _lock = cwd_lock().lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let mut settings = settings(&dir);
    // The runtime script fails; the static script must already have run.
    settings.before_script = Some("false".to_string());
    let mut commands = command_set();
    commands.before_scripts = Some(vec!["touch static-first.txt".to_string()]);

    let err = pipeline::run(&settings, &commands).unwrap_err();

    assert!(err.to_string().starts_with("before script:"));
    assert!(ran(&dir, "static-first.txt"));
}

#[test]
fn merged_config_drives_a_full_run() {
    let _lock = cwd_lock().lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();

    let base = dir.path().join("cdk-config.yml");
    std::fs::write(
        &base,
        r#"
cdk-pipe:
  beforeScripts:
    - touch before.txt
  commands:
    cdk:
      synth: touch synth.txt
      diff: touch diff.txt
      deploy: touch deploy.txt
      bootstrap: touch bootstrap.txt
    npm:
      install: touch install.txt
"#,
    )
    .unwrap();

    let overlay = dir.path().join("override.yml");
    std::fs::write(
        &overlay,
        "cdk-pipe:\n  commands:\n    cdk:\n      deploy: touch deploy-override.txt\n",
    )
    .unwrap();

    let merged = config::load(
        base.to_str().unwrap(),
        Some(overlay.to_str().unwrap()),
    )
    .unwrap();
    let commands = CommandSet::resolve(&merged).unwrap();

    pipeline::run(&settings(&dir), &commands).unwrap();

    assert!(ran(&dir, "before.txt"));
    assert!(ran(&dir, "install.txt"));
    assert!(ran(&dir, "deploy-override.txt"));
    assert!(!ran(&dir, "deploy.txt"));
}
