//! Tracing subscriber setup
//!
//! This module provides the tracing configuration used by the replay binary.
//! Output goes to a log file so that it never mixes with the rendered tree on
//! stdout.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Default log file for this process: `{temp_dir}/trace-tree-{PID}.log`
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join(format!("trace-tree-{}.log", std::process::id()))
}

/// Initialize the global tracing subscriber with file logging.
///
/// Filtering follows RUST_LOG, with DEBUG added as the default directive.
pub fn init_global(log_file_path: &Path) -> std::io::Result<()> {
    let log_file = File::create(log_file_path)?;
    let subscriber = build_subscriber(log_file);
    subscriber.init();
    Ok(())
}

/// Build a subscriber that writes to `log_file`.
///
/// This is the core subscriber configuration shared between the binary and tests.
pub fn build_subscriber(log_file: File) -> impl tracing::Subscriber + Send + Sync {
    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into());

    let fmt_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry().with(fmt_layer).with(env_filter)
}
