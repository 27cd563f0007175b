//! Tracing subscriber setup

use std::path::Path;

use anyhow::Context;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Filter used when `RUST_LOG` is not set
pub fn default_directives(level: &str) -> String {
    format!("library_catalog_server={level},tower_http=info")
}

/// Install the global subscriber.
///
/// The returned guard flushes the log file on drop and must live as long as
/// the process.
pub fn init(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(&config.level)))
        .context("Invalid log filter")?;

    let mut layers: Vec<BoxedLayer> = Vec::new();

    if config.format.eq_ignore_ascii_case("json") {
        layers.push(fmt::layer().json().with_current_span(true).boxed());
    } else {
        layers.push(fmt::layer().pretty().boxed());
    }

    let guard = match config.file.as_deref() {
        Some(file) => {
            let (layer, guard) = file_layer(Path::new(file))?;
            layers.push(layer);
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(
        level = %config.level,
        format = %config.format,
        file = config.file.as_deref().unwrap_or("-"),
        "Logging initialized"
    );

    Ok(guard)
}

fn file_layer(path: &Path) -> anyhow::Result<(BoxedLayer, WorkerGuard)> {
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Invalid log file path: {}", path.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(directory)
        .with_context(|| format!("Cannot open log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_ansi(false)
        .with_writer(writer)
        .boxed();

    Ok((layer, guard))
}
