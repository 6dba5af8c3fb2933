use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing variable: {0}")]
    Variable(String),

    #[error("command '{command}' failed: {detail}")]
    Command { command: String, detail: String },

    #[error("{phase}: {source}")]
    Phase {
        phase: String,
        #[source]
        source: Box<Error>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config(_) => "CONFIG_ERROR",
            Error::Variable(_) => "MISSING_VARIABLE",
            Error::Command { .. } => "COMMAND_ERROR",
            Error::Phase { .. } => "PHASE_FAILED",
            Error::Io(_) => "IO_ERROR",
            Error::Yaml(_) => "YAML_ERROR",
        }
    }

    /// Wrap an error with the phase it occurred in (e.g. "cdk deploy").
    pub fn in_phase(self, phase: &str) -> Error {
        Error::Phase {
            phase: phase.to_string(),
            source: Box::new(self),
        }
    }
}
