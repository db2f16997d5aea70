//! Structured logging for the orrery viewer.
//!
//! Console output always goes to stderr with uptime timestamps and targets.
//! Debug builds additionally write JSON lines to `orrery.log` in the log
//! directory so a session can be inspected after a crash.

use orrery_config::Config;
use std::fs::File;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// File written inside the log directory in debug builds.
pub const LOG_FILE_NAME: &str = "orrery.log";

/// Directive used when neither `RUST_LOG` nor the config names a level.
/// GPU crates are chatty at `info`, so they are held at `warn`.
pub const DEFAULT_DIRECTIVE: &str = "info,wgpu=warn,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Filter directive derived from the config's `debug.log_level`.
///
/// A bare level ("debug") keeps the GPU crates quiet; a full directive
/// ("info,orrery_render=trace") is used as written.
pub fn filter_directive(config: Option<&Config>) -> String {
    let level = config.map(|c| c.debug.log_level.trim()).unwrap_or_default();
    if level.is_empty() {
        DEFAULT_DIRECTIVE.to_string()
    } else if level.contains(',') || level.contains('=') {
        level.to_string()
    } else {
        format!("{level},wgpu=warn,wgpu_core=warn,wgpu_hal=warn,naga=warn")
    }
}

fn open_log_file(log_dir: &Path) -> Option<File> {
    std::fs::create_dir_all(log_dir).ok()?;
    File::create(log_dir.join(LOG_FILE_NAME)).ok()
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the config. A second call is a no-op, which keeps
/// tests that build an app from panicking.
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let directive = filter_directive(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directive));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    let file = if debug_build {
        log_dir.and_then(open_log_file)
    } else {
        None
    };

    let result = match file {
        Some(log_file) => {
            let file_layer = fmt::layer()
                .with_writer(log_file)
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::uptime())
                .json();
            subscriber.with(file_layer).try_init()
        }
        None => subscriber.try_init(),
    };

    match result {
        Ok(()) => tracing::debug!(%directive, "Logging initialized"),
        Err(e) => tracing::debug!("Logging already initialized: {e}"),
    }
}
