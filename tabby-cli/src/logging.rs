use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tabby_engine::{TabbyError, TabbyResult};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration for the command line tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Base log level for every other crate
    pub level: String,

    /// Whether to enable JSON formatted logs
    pub json_format: bool,

    /// Whether to enable colored output (only for non-JSON format)
    pub enable_colors: bool,

    /// Log file path; rotated daily when set
    pub log_file: Option<PathBuf>,

    /// Module-specific log levels
    pub module_levels: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_verbosity(0, false)
    }
}

impl LoggingConfig {
    /// `-v` raises tabby's own crates to debug (`-vv` to trace), `-q` lowers
    /// everything to errors
    pub fn for_verbosity(verbose: u8, quiet: bool) -> Self {
        let own_level = match (quiet, verbose) {
            (true, _) => "error",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        };

        let module_levels = ["tabby", "tabby_engine"]
            .into_iter()
            .map(|module| (module.to_string(), own_level.to_string()))
            .collect();

        Self {
            level: if quiet { "error" } else { "warn" }.to_string(),
            json_format: false,
            enable_colors: true,
            log_file: None,
            module_levels,
        }
    }

    /// Filter directives, e.g. `warn,tabby=info,tabby_engine=info`
    pub fn directives(&self) -> String {
        std::iter::once(self.level.clone())
            .chain(
                self.module_levels
                    .iter()
                    .map(|(module, level)| format!("{}={}", module, level)),
            )
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured levels. Logs go to stderr
/// so they never interleave with reports on stdout. The returned guard must
/// be held until exit when a log file is configured.
pub fn init_logging(config: &LoggingConfig) -> TabbyResult<Option<WorkerGuard>> {
    for level in std::iter::once(&config.level).chain(config.module_levels.values()) {
        if !levels::is_valid_level(level) {
            return Err(TabbyError::configuration(
                "logging",
                &format!("invalid log level '{}'", level),
            ));
        }
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.directives()).map_err(|e| {
            TabbyError::configuration("logging", &format!("invalid log directive: {}", e))
        })?,
    };

    let text_layer = (!config.json_format).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(config.enable_colors)
    });
    let json_layer = config
        .json_format
        .then(|| fmt::layer().json().with_writer(std::io::stderr));

    let (file_layer, guard) = match &config.log_file {
        Some(path) => {
            let appender = create_file_appender(path)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .with(file_layer)
        .try_init();

    if result.is_err() {
        tracing::debug!("Logging already initialized, skipping");
    }

    Ok(guard)
}

/// Create a daily rolling appender for `log_file`
fn create_file_appender(
    log_file: &Path,
) -> TabbyResult<tracing_appender::rolling::RollingFileAppender> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};

    let directory = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let filename = log_file
        .file_name()
        .ok_or_else(|| TabbyError::configuration("logging", "invalid log file name"))?;

    std::fs::create_dir_all(directory).map_err(|e| {
        TabbyError::configuration("logging", &format!("failed to create log directory: {}", e))
    })?;

    Ok(RollingFileAppender::new(Rotation::DAILY, directory, filename))
}

/// Log level utilities
pub mod levels {
    /// Check if a log level string is valid
    pub fn is_valid_level(level: &str) -> bool {
        matches!(
            level.to_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error" | "off"
        )
    }
}
