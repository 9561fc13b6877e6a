mod config;
mod pipeline;

use config::ToolConfig;
use pipeline::{Pipeline, Stage};
use tracing::{error, info};

const DEFAULT_CONFIG: &str = "schem-rs.toml";

fn main() {
    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG.into());
    let stage = match args.next().as_deref().unwrap_or("all").parse::<Stage>() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let config = match ToolConfig::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            std::process::exit(1);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let pipeline = Pipeline::new(&config);
    info!(
        "schem-rs v{} running stage {stage} (input: {}, work dir: {})",
        env!("CARGO_PKG_VERSION"),
        config.paths.input.display(),
        pipeline.files().dir.display()
    );

    if let Err(e) = pipeline.run(stage) {
        error!("Stage {stage} failed: {e}");
        std::process::exit(1);
    }
}
