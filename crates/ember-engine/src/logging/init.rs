use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` uses `env_logger` filter syntax, e.g.
/// `"ember_engine=debug,wgpu=warn"`. When unset, `RUST_LOG` is read, and
/// without that the level is `info`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl LoggingConfig {
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.env_filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            // wgpu and winit are chatty at info.
            None => {
                builder
                    .filter_level(log::LevelFilter::Info)
                    .filter_module("wgpu_core", log::LevelFilter::Warn)
                    .filter_module("wgpu_hal", log::LevelFilter::Warn)
                    .filter_module("naga", log::LevelFilter::Warn);
            }
        }

        builder.write_style(config.write_style);

        // Another logger may already be installed (tests, embedding hosts).
        if builder.try_init().is_err() {
            log::debug!("global logger already installed; keeping it");
            return;
        }

        log::debug!("logging initialized");
    });
}
