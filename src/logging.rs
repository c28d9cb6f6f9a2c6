use crate::config::DashboardConfig;
use log::{debug, info};

/// Initialize the logger; `verbose` enables debug output. `RUST_LOG` still applies.
pub fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    debug!("Logger initialized with level: {level:?}");
}

/// Log the resolved configuration
pub fn log_config_info(config: &DashboardConfig) {
    info!(
        "Configuration: data={}, shapes={}, region_key={}",
        config.data_path.display(),
        config.geojson_path.display(),
        config.region_key
    );
    debug!(
        "CSV: separator={:?}, decimal_comma={}; language={}, theme={}",
        config.separator,
        config.decimal_comma,
        config.language.name(),
        config.color_theme.name()
    );
}
