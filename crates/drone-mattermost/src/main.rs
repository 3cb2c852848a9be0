use std::path::Path;
use std::process;

use clap::Parser;
use tokio::runtime::Runtime;

use drone_mattermost::cli::Cli;
use drone_mattermost::config::{load_env_file, Config};
use drone_mattermost::orchestrator::run;
use drone_mattermost::pipeline::Pipeline;
use drone_mattermost::{setup_logging, Error};

/// Drone writes step-scoped variables here.
const DRONE_ENV_FILE: &str = "/run/drone/env";

fn main() {
    if let Err(err) = try_main() {
        eprintln!("execution failed: {err:#}");
        let code = err
            .downcast_ref::<Error>()
            .map(|e| e.kind().exit_code())
            .unwrap_or(1);
        process::exit(code);
    }
}

fn try_main() -> anyhow::Result<()> {
    let skipped = load_env_file(Path::new(DRONE_ENV_FILE));

    let cli = Cli::parse();
    let config = Config::load(&cli)?;
    setup_logging(&config.log_level);
    for entry in &skipped {
        tracing::warn!("skipped env file entry: {entry}");
    }

    let pipeline = Pipeline::from_env();

    let rt = Runtime::new()?;
    rt.block_on(run(&config, &pipeline))?;
    Ok(())
}
