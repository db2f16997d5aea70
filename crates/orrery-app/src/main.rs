//! Orrery binary: resolve directories, load config, start logging, run.

use std::process::ExitCode;

use clap::Parser;
use orrery_app::{PlatformDirs, run_with_config};
use orrery_config::{CliArgs, Config};
use tracing::{error, info, warn};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = match PlatformDirs::resolve_and_create(args.config_dir.as_deref()) {
        Ok(dirs) => dirs,
        Err(e) => {
            // Logging needs the log directory, so this goes to stderr.
            eprintln!("Failed to initialize platform directories: {e}");
            return ExitCode::FAILURE;
        }
    };

    let (mut config, load_error) = match Config::load_or_create(&dirs.config_dir) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    config.apply_cli_overrides(&args);

    orrery_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));

    if let Some(e) = load_error {
        warn!("Using default configuration: {e}");
    }
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {e}");
        return ExitCode::FAILURE;
    }

    info!("Orrery v{}", env!("CARGO_PKG_VERSION"));
    info!(
        config = %dirs.config_dir.display(),
        logs = %dirs.log_dir.display(),
        textures = %config.assets.texture_dir.display(),
        "Directories"
    );
    info!(
        "Window: {}x{} | Title: {}",
        config.window.width, config.window.height, config.window.title
    );

    match run_with_config(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            // The window never opened; make sure the reason reaches the
            // terminal even when the log filter hides errors.
            let _ = e.write_report(&mut std::io::stderr().lock());
            ExitCode::FAILURE
        }
    }
}
