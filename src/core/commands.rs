//! Extraction of the named commands from the merged configuration.
//!
//! Commands live at fixed paths under the top-level `cdk-pipe` key.
//! Required commands are fatal when absent; optional commands and the
//! before/after script lists degrade to `None` with a warning.

use serde_yml::Value;

use crate::error::{Error, Result};
use crate::log_warn;

/// Resolved view over the merged configuration.
///
/// Command strings are passed through verbatim; no syntax validation
/// happens here.
#[derive(Debug, Clone)]
pub struct CommandSet {
    pub install: String,
    pub bootstrap: String,
    pub deploy: String,
    pub diff: String,
    pub synth: String,
    pub lint: Option<String>,
    pub format: Option<String>,
    pub before_scripts: Option<Vec<String>>,
    pub after_scripts: Option<Vec<String>>,
}

impl CommandSet {
    pub fn resolve(config: &Value) -> Result<CommandSet> {
        Ok(CommandSet {
            install: required_string(config, &["cdk-pipe", "commands", "npm", "install"])?,
            bootstrap: required_string(config, &["cdk-pipe", "commands", "cdk", "bootstrap"])?,
            deploy: required_string(config, &["cdk-pipe", "commands", "cdk", "deploy"])?,
            diff: required_string(config, &["cdk-pipe", "commands", "cdk", "diff"])?,
            synth: required_string(config, &["cdk-pipe", "commands", "cdk", "synth"])?,
            lint: optional_string(config, &["cdk-pipe", "commands", "npm", "checks", "lint"])?,
            format: optional_string(config, &["cdk-pipe", "commands", "npm", "checks", "format"])?,
            before_scripts: optional_sequence(config, &["cdk-pipe", "beforeScripts"])?,
            after_scripts: optional_sequence(config, &["cdk-pipe", "afterScripts"])?,
        })
    }
}

fn lookup<'a>(config: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut node = config;
    for key in path {
        node = node.get(*key)?;
    }
    Some(node)
}

fn required_string(config: &Value, path: &[&str]) -> Result<String> {
    match lookup(config, path) {
        Some(Value::String(command)) => Ok(command.clone()),
        Some(_) => Err(Error::Config(format!(
            "'{}' in static config must be a string",
            path.join(".")
        ))),
        None => Err(Error::Config(format!(
            "could not find the definition for '{}' in static config",
            path.join(".")
        ))),
    }
}

fn optional_string(config: &Value, path: &[&str]) -> Result<Option<String>> {
    match lookup(config, path) {
        Some(Value::String(command)) => Ok(Some(command.clone())),
        Some(_) => Err(Error::Config(format!(
            "'{}' in static config must be a string",
            path.join(".")
        ))),
        None => {
            log_warn!("'{}' in static config not found", path.join("."));
            Ok(None)
        }
    }
}

fn optional_sequence(config: &Value, path: &[&str]) -> Result<Option<Vec<String>>> {
    match lookup(config, path) {
        Some(Value::Sequence(items)) => {
            let mut commands = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(command) => commands.push(command.clone()),
                    _ => {
                        return Err(Error::Config(format!(
                            "'{}' in static config must be a list of strings",
                            path.join(".")
                        )))
                    }
                }
            }
            Ok(Some(commands))
        }
        Some(_) => Err(Error::Config(format!(
            "'{}' in static config must be a list of strings",
            path.join(".")
        ))),
        None => {
            log_warn!("'{}' in static config not found", path.join("."));
            Ok(None)
        }
    }
}
