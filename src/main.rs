use clap::Parser;
use exercise_streak::{Cli, run};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

/// Exit status for any failure other than a missing exercise in `check`.
const FAILURE_EXIT: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => Ok(code),
        Err(err) => {
            error!("{err}");
            Ok(ExitCode::from(FAILURE_EXIT))
        }
    }
}
