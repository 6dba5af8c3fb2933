//! Phase orchestration for a deployment run.
//!
//! Strictly linear: before-scripts, npm install, lint/format checks,
//! bootstrap, deploy, diff, synth, after-scripts. Install always runs;
//! the other phases are gated on their enable flags. The first failure
//! stops the run with a phase-prefixed error; nothing is retried and
//! nothing is rolled back.

use crate::commands::CommandSet;
use crate::error::Result;
use crate::runner::{self, ExecutionResult};
use crate::variables::Settings;
use crate::{log_info, log_warn};

/// Execute the full pipeline.
pub fn run(settings: &Settings, commands: &CommandSet) -> Result<()> {
    log_info!("working directory: {}", settings.working_dir);

    scripts(
        "before script",
        settings,
        commands.before_scripts.as_deref(),
        settings.before_script.as_deref(),
    )?;

    cdk(settings, commands)?;

    scripts(
        "after script",
        settings,
        commands.after_scripts.as_deref(),
        settings.after_script.as_deref(),
    )
}

/// Run the install/check/cdk phases in order.
fn cdk(settings: &Settings, commands: &CommandSet) -> Result<()> {
    let dir = &settings.working_dir;

    log_info!("installing npm packages[{}] => {}", dir, commands.install);
    run_phase("npm install", dir, commands.install.clone())?;

    if settings.lint {
        if let Some(command) = check_command(settings.lint_command.as_deref(), commands.lint.as_deref()) {
            log_info!("lint check initiated[{}] => {}", dir, command);
            run_phase("lint check", dir, command)?;
        }
    }

    if settings.format {
        if let Some(command) =
            check_command(settings.format_command.as_deref(), commands.format.as_deref())
        {
            log_info!("format check initiated[{}] => {}", dir, command);
            run_phase("format check", dir, command)?;
        }
    }

    if settings.bootstrap {
        let command = extend(&commands.bootstrap, settings.extra_args_bootstrap.as_deref());
        log_info!("cdk bootstrap initiated[{}] => {}", dir, command);
        run_phase("cdk bootstrap", dir, command)?;
    }

    if settings.deploy {
        let command = extend(&commands.deploy, settings.extra_args.as_deref());
        log_info!("cdk deploy initiated[{}] => {}", dir, command);
        run_phase("cdk deploy", dir, command)?;
    }

    if settings.diff {
        let command = extend(&commands.diff, settings.extra_args_diff.as_deref());
        log_info!("cdk diff initiated[{}] => {}", dir, command);
        run_phase("cdk diff", dir, command)?;
    }

    if settings.synth {
        let command = extend(&commands.synth, settings.extra_args_synth.as_deref());
        log_info!("cdk synth initiated[{}] => {}", dir, command);
        run_phase("cdk synth", dir, command)?;
    }

    Ok(())
}

/// Run one phase's command, wrapping any failure with the phase name.
fn run_phase(phase: &str, working_dir: &str, command: String) -> Result<()> {
    runner::run_batch(working_dir, &[command])
        .map(|_| ())
        .map_err(|e| e.in_phase(phase))
}

/// Run the before or after scripts: static list first, then the inline
/// runtime script split on `;`.
fn scripts(
    phase: &str,
    settings: &Settings,
    static_scripts: Option<&[String]>,
    runtime_script: Option<&str>,
) -> Result<()> {
    let mut output: Vec<ExecutionResult> = Vec::new();

    if let Some(commands) = static_scripts {
        let results = runner::run_batch(&settings.working_dir, commands)
            .map_err(|e| e.in_phase(phase))?;
        output.extend(results);
    }

    if let Some(script) = runtime_script.filter(|s| !s.trim().is_empty()) {
        let commands: Vec<String> = script.split(';').map(|c| c.trim().to_string()).collect();
        let results = runner::run_batch(&settings.working_dir, &commands)
            .map_err(|e| e.in_phase(phase))?;
        output.extend(results);
    }

    for result in &output {
        log_info!("{}: {}", phase, result.log);
    }

    Ok(())
}

/// Append the argument extension to a command, space-joined.
///
/// The combined string is whitespace-split by the runner, so extensions
/// with embedded quoting are not supported.
fn extend(command: &str, extension: Option<&str>) -> String {
    match extension.filter(|e| !e.trim().is_empty()) {
        Some(extension) => {
            log_warn!("'{}' has been extended with '{}'", command, extension);
            format!("{} {}", command, extension)
        }
        None => command.to_string(),
    }
}

/// Pick the command for a lint/format check: the override variable wins
/// over the static config command; neither present means skip.
fn check_command(override_command: Option<&str>, static_command: Option<&str>) -> Option<String> {
    match (override_command, static_command) {
        (Some(command), Some(replaced)) => {
            log_warn!("static command '{}' has been overridden with '{}'", replaced, command);
            Some(command.to_string())
        }
        (Some(command), None) => Some(command.to_string()),
        (None, Some(command)) => Some(command.to_string()),
        (None, None) => None,
    }
}
