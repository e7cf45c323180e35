//! Tracing initialization and subscriber setup.

use super::file_writer::RotatingFile;
use crate::domain::error::Result;
use crate::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level used when neither `RUST_LOG` nor the configuration names one.
const DEFAULT_LEVEL: &str = "info";

/// Builds the event filter.
///
/// Priority: `RUST_LOG`, then `config.log_level`, then `"info"`.
fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.log_level.as_deref().unwrap_or(DEFAULT_LEVEL))
    })
}

/// Installs the global tracing subscriber.
///
/// Events are formatted by a `fmt` layer and written to `config.log_file`
/// through a size-rotated [`RotatingFile`] when set, or to stderr otherwise.
/// Calling this again after a subscriber is installed does nothing.
///
/// # Errors
///
/// Returns an error if the log file's directory cannot be created.
///
/// # Example
///
/// ```rust
/// use dexquery::observability::init_tracing;
/// use dexquery::Config;
///
/// let config = Config {
///     log_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config)?;
/// tracing::debug!("tracing is now active");
/// # Ok::<(), dexquery::DexError>(())
/// ```
pub fn init_tracing(config: &Config) -> Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    let installed = match &config.log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            registry
                .with(
                    fmt::layer()
                        .with_ansi(false)
                        .with_writer(RotatingFile::new(path.clone())),
                )
                .try_init()
        }
        None => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialization_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            log_file: Some(dir.path().join("logs").join("dexquery.log")),
            ..Config::default()
        };

        init_tracing(&config).unwrap();
        init_tracing(&config).unwrap();
        assert!(dir.path().join("logs").is_dir());
    }
}
