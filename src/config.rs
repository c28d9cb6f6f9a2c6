//! Dashboard Configuration
//! TOML file settings merged with command line flags (CLI takes precedence).

use crate::charts::ColorTheme;
use crate::data::CsvOptions;
use crate::i18n::Language;
use clap::Parser;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "brede_welvaart.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Separator must be a single ASCII character, got {0:?}")]
    InvalidSeparator(char),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Indicator table
    pub data_path: PathBuf,
    /// Municipality shapes
    pub geojson_path: PathBuf,
    pub separator: char,
    pub decimal_comma: bool,
    /// GeoJSON property holding the municipality name
    pub region_key: String,
    pub language: Language,
    pub color_theme: ColorTheme,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("indicatoren.csv"),
            geojson_path: PathBuf::from("Indicator_01_KL_OK_11.geojson"),
            separator: ';',
            decimal_comma: false,
            region_key: "statnaam".to_string(),
            language: Language::default(),
            color_theme: ColorTheme::default(),
            window_width: 1400.0,
            window_height: 900.0,
        }
    }
}

/// Command line flags.
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "brede_welvaart", version, about = "Broad prosperity dashboard")]
pub struct CliArgs {
    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Indicator CSV file
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// GeoJSON file with municipality shapes
    #[arg(long)]
    pub geojson: Option<PathBuf>,

    /// Display language
    #[arg(long, value_enum)]
    pub lang: Option<Language>,

    /// Initial color theme
    #[arg(long, value_enum)]
    pub theme: Option<ColorTheme>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl DashboardConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Config from the working directory, or defaults.
    pub fn load_from_standard_locations() -> Self {
        let path = Path::new(CONFIG_FILE_NAME);
        if !path.exists() {
            debug!("No {} found, using defaults", CONFIG_FILE_NAME);
            return Self::default();
        }
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring {}: {}", CONFIG_FILE_NAME, e);
                Self::default()
            }
        }
    }

    /// Resolve the config for a run: explicit `--config`, else standard location,
    /// then CLI overrides.
    pub fn resolve(cli: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_from_standard_locations(),
        };
        config.merge_with_cli(cli);
        Ok(config)
    }

    pub fn merge_with_cli(&mut self, cli: &CliArgs) {
        if let Some(ref data) = cli.data {
            self.data_path = data.clone();
        }
        if let Some(ref geojson) = cli.geojson {
            self.geojson_path = geojson.clone();
        }
        if let Some(lang) = cli.lang {
            self.language = lang;
        }
        if let Some(theme) = cli.theme {
            self.color_theme = theme;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.separator.is_ascii() {
            return Err(ConfigError::InvalidSeparator(self.separator));
        }
        Ok(())
    }

    pub fn csv_options(&self) -> CsvOptions {
        CsvOptions {
            // validated as ASCII
            separator: self.separator as u8,
            decimal_comma: self.decimal_comma,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_source_files() {
        let config = DashboardConfig::default();
        assert_eq!(config.data_path, PathBuf::from("indicatoren.csv"));
        assert_eq!(config.separator, ';');
        assert_eq!(config.region_key, "statnaam");
        assert_eq!(config.csv_options().separator, b';');
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = DashboardConfig::from_toml(
            r#"
            data_path = "data/bw.csv"
            language = "en"
            color_theme = "viridis"
            "#,
        )
        .unwrap();
        assert_eq!(config.data_path, PathBuf::from("data/bw.csv"));
        assert_eq!(config.language, Language::English);
        assert_eq!(config.color_theme, ColorTheme::Viridis);
        assert_eq!(config.region_key, "statnaam");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = DashboardConfig::from_toml("colour = \"red\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn non_ascii_separator_is_rejected() {
        let err = DashboardConfig::from_toml("separator = \"§\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSeparator('§')));
    }

    #[test]
    fn cli_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "data_path = \"from_file.csv\"\nlanguage = \"en\"").unwrap();

        let cli = CliArgs {
            config: Some(file.path().to_path_buf()),
            data: Some(PathBuf::from("from_cli.csv")),
            theme: Some(ColorTheme::Magma),
            ..Default::default()
        };
        let config = DashboardConfig::resolve(&cli).unwrap();
        assert_eq!(config.data_path, PathBuf::from("from_cli.csv"));
        assert_eq!(config.language, Language::English);
        assert_eq!(config.color_theme, ColorTheme::Magma);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let cli = CliArgs {
            config: Some(PathBuf::from("/definitely/not/here.toml")),
            ..Default::default()
        };
        assert!(matches!(DashboardConfig::resolve(&cli), Err(ConfigError::Io(_))));
    }

    #[test]
    fn cli_parses_flags() {
        let cli = CliArgs::parse_from(["brede_welvaart", "--lang", "en", "--theme", "turbo", "-v"]);
        assert_eq!(cli.lang, Some(Language::English));
        assert_eq!(cli.theme, Some(ColorTheme::Turbo));
        assert!(cli.verbose);
    }
}
