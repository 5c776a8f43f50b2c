use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "easel_engine=trace,wgpu_core=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Raises the fallback filter to `debug` for this crate.
    pub debug: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            debug: false,
        }
    }
}

impl LoggingConfig {
    /// Filter used when neither `env_filter` nor `RUST_LOG` is set.
    fn fallback_filter(&self) -> &'static str {
        if self.debug {
            "info,easel_engine=debug,easel_demo=debug,wgpu_core=warn,wgpu_hal=warn"
        } else {
            "info,wgpu_core=warn,wgpu_hal=warn"
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = &config.env_filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.parse_filters(config.fallback_filter());
        }

        builder.write_style(config.write_style);
        // Tests may install their own logger first.
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized");
    });
}
