/// Macro for info-level logging to stderr.
///
/// Usage:
/// ```ignore
/// log_info!("working directory: {}", dir);
/// log_info!("cdk deploy initiated[{}] => {}", dir, command);
/// ```
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        eprintln!("INFO: {}", format_args!($($arg)*))
    };
}

/// Macro for warning-level logging to stderr.
///
/// Usage:
/// ```ignore
/// log_warn!("before script in static config not found");
/// ```
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        eprintln!("WARNING: {}", format_args!($($arg)*))
    };
}

pub mod core;

// Re-export everything from core for ergonomic library use
// Users can write `cdk_pipe::config` instead of `cdk_pipe::core::config`
pub use self::core::*;
