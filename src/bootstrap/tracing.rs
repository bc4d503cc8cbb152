//! Tracing configuration for karaoke-sync.
//!
//! Library crates only emit `tracing` events and spans; this module installs
//! the global subscriber for the binary:
//!
//! - `EnvFilter` honouring `RUST_LOG`, with per-crate defaults
//! - stderr fmt layer
//! - optional non-blocking file layer under the platform data directory
//! - optional Sentry layer when `SENTRY_DSN` is set

use std::{fs, io, path::PathBuf, sync::OnceLock};

use anyhow::Context;
use ks_core::config::LoggingConfig;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static SENTRY_GUARD: OnceLock<sentry::ClientInitGuard> = OnceLock::new();

const LOG_FILE_NAME: &str = "karaoke-sync.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Build the default filter directives for tracing.
///
/// HTTP client internals stay at `warn`; the workspace crates follow the
/// build profile.
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    let level = if is_dev { "debug" } else { "info" };
    let mut directives = vec![
        level.to_string(),
        "hyper=warn".to_string(),
        "hyper_util=warn".to_string(),
        "reqwest=warn".to_string(),
        "rustls=warn".to_string(),
    ];
    directives.extend(
        ["karaoke_sync", "ks_core", "ks_app", "ks_infra"]
            .iter()
            .map(|krate| format!("{krate}={level}")),
    );
    directives
}

/// Initialize the global tracing subscriber.
///
/// Call once from `main`, after config is loaded and before any work starts.
///
/// # Errors
///
/// Returns `Err` if a global subscriber is already registered.
pub fn init_tracing_subscriber(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter_directives = build_filter_directives(is_development());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter_directives.join(",")));

    let sentry_layer = match std::env::var("SENTRY_DSN") {
        Ok(dsn) if !dsn.is_empty() => {
            let guard = sentry::init((
                dsn,
                sentry::ClientOptions {
                    release: sentry::release_name!(),
                    traces_sample_rate: 1.0,
                    ..Default::default()
                },
            ));
            if SENTRY_GUARD.set(guard).is_err() {
                eprintln!("Sentry guard already initialized");
            }
            Some(sentry_tracing::layer())
        }
        _ => None,
    };

    // stderr keeps stdout free for command output
    let console_writer: BoxMakeWriter = BoxMakeWriter::new(io::stderr);
    let file_writer = if logging.file_logging {
        match build_file_writer() {
            Ok(writer) => Some(writer),
            Err(err) => {
                eprintln!("Failed to initialize file logging, continuing without it: {err:#}");
                None
            }
        }
    } else {
        None
    };

    // "2025-01-15 10:30:45.123 INFO [file.rs:42] [target] message"
    let console_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(console_writer);

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    registry()
        .with(env_filter)
        .with(sentry_layer)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

pub fn logs_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("karaoke-sync").join("logs"))
}

fn build_file_writer() -> anyhow::Result<NonBlocking> {
    let logs_dir = logs_dir().context("No data directory on this platform")?;
    fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Failed to create log directory {}", logs_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(&logs_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}
