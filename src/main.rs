use clap::Parser;

use cdk_pipe::commands::CommandSet;
use cdk_pipe::variables::Settings;
use cdk_pipe::{config, log_info, log_warn, pipeline};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "cdk-pipe")]
#[command(version = VERSION)]
#[command(about = "CI pipe for executing AWS CDK deployment workflows")]
struct Cli {
    /// Path to the pipe configuration file
    #[arg(long, default_value = "cdk-config.yml")]
    config: String,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {} ({})", err, err.code());
            std::process::ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> cdk_pipe::Result<()> {
    let settings = Settings::from_env()?;

    if settings.debug {
        log_info!(
            "resolved settings: {}",
            serde_json::to_string(&settings).unwrap_or_default()
        );
    }

    if let Some(path) = settings.config_path.as_deref() {
        log_warn!("static config has been altered: {}", path);
    }

    let merged = config::load(&cli.config, settings.config_path.as_deref())?;
    let commands = CommandSet::resolve(&merged)?;

    pipeline::run(&settings, &commands)
}
