use crate::config::{LogRotation, LoggingConfig};
use crate::error::Result;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the global subscriber described by `[logging]`.
///
/// With a log directory configured, events are also written as JSON through a
/// non-blocking rolling file writer; the returned guard flushes it on drop and
/// must outlive the process's last event.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match &config.dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let (writer, guard) = tracing_appender::non_blocking(file_appender(config, dir));
            (Some(fmt::layer().json().with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    let console_layer = config.console.then(|| {
        fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_writer(std::io::stdout)
    });

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(file_layer)
        .with(console_layer)
        .init();

    Ok(guard)
}

fn file_appender(config: &LoggingConfig, dir: &std::path::Path) -> RollingFileAppender {
    let prefix = config.file_prefix.as_str();
    match config.rotation {
        LogRotation::Hourly => rolling::hourly(dir, prefix),
        LogRotation::Daily => rolling::daily(dir, prefix),
        LogRotation::Never => rolling::never(dir, prefix),
    }
}

/// `RUST_LOG` when set and valid, otherwise the configured directives
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| configured_filter(config))
}

fn configured_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_new(&config.filter).unwrap_or_else(|e| {
        eprintln!("Invalid log filter '{}' ({e}); falling back to info", config.filter);
        EnvFilter::new("info")
    })
}
