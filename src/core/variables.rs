//! Resolution of the pipe's external variables.
//!
//! The variable schema is fixed: credentials, a working directory,
//! per-phase enable flags, per-phase argument extensions, inline
//! before/after scripts, and an optional override config path. All
//! variables resolve exactly once, at startup, into an immutable
//! [`Settings`] snapshot.

use serde::Serialize;

use crate::error::{Error, Result};

type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Immutable snapshot of the resolved external variables.
///
/// Credentials (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`) are
/// validated during resolution but deliberately not stored here: the
/// pipe never uses them itself, subprocesses inherit the environment,
/// and keeping them out also keeps them out of the DEBUG dump.
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    pub working_dir: String,
    pub debug: bool,
    pub bootstrap: bool,
    pub synth: bool,
    pub diff: bool,
    pub deploy: bool,
    pub lint: bool,
    pub format: bool,
    pub before_script: Option<String>,
    pub after_script: Option<String>,
    pub extra_args: Option<String>,
    pub extra_args_diff: Option<String>,
    pub extra_args_synth: Option<String>,
    pub extra_args_bootstrap: Option<String>,
    pub lint_command: Option<String>,
    pub format_command: Option<String>,
    pub config_path: Option<String>,
}

impl Settings {
    /// Resolve all variables from the process environment.
    pub fn from_env() -> Result<Settings> {
        Settings::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve all variables through an injected lookup.
    ///
    /// Tests pass a closure over a map instead of touching the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Settings> {
        let lookup: Lookup = &lookup;

        // Required credentials, passed through to subprocesses via the
        // inherited environment.
        required(lookup, "AWS_ACCESS_KEY_ID")?;
        required(lookup, "AWS_SECRET_ACCESS_KEY")?;

        Ok(Settings {
            working_dir: optional(lookup, "CDK_ROOT_DIR").unwrap_or_else(|| "./".to_string()),
            debug: boolean(lookup, "DEBUG", false)?,
            bootstrap: boolean(lookup, "CDK_BOOTSTRAP", false)?,
            synth: boolean(lookup, "CDK_SYNTH", false)?,
            diff: boolean(lookup, "CDK_DIFF", false)?,
            deploy: boolean(lookup, "CDK_DEPLOY", true)?,
            lint: boolean(lookup, "CDK_LINT", true)?,
            format: boolean(lookup, "CDK_FORMAT", true)?,
            before_script: optional(lookup, "CDK_BEFORE_SCRIPT"),
            after_script: optional(lookup, "CDK_AFTER_SCRIPT"),
            extra_args: optional(lookup, "CDK_EXTRA_ARGS"),
            extra_args_diff: optional(lookup, "CDK_EXTRA_ARGS_DIFF"),
            extra_args_synth: optional(lookup, "CDK_EXTRA_ARGS_SYNTH"),
            extra_args_bootstrap: optional(lookup, "CDK_EXTRA_ARGS_BOOTSTRAP"),
            lint_command: optional(lookup, "CDK_LINT_COMMAND"),
            format_command: optional(lookup, "CDK_FORMAT_COMMAND"),
            config_path: optional(lookup, "CDK_CONFIG_PATH"),
        })
    }
}

fn required(lookup: Lookup, name: &str) -> Result<String> {
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| Error::Variable(format!("required variable '{}' is not set", name)))
}

fn optional(lookup: Lookup, name: &str) -> Option<String> {
    lookup(name).filter(|value| !value.trim().is_empty())
}

fn boolean(lookup: Lookup, name: &str, default: bool) -> Result<bool> {
    match optional(lookup, name) {
        None => Ok(default),
        Some(raw) => parse_bool(&raw).ok_or_else(|| {
            Error::Variable(format!("variable '{}' is not a boolean: '{}'", name, raw))
        }),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
