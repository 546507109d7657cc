use anyhow::anyhow;
use clap::Parser;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::{Read, Write},
    path::PathBuf,
};
use time::{format_description::well_known::Iso8601, OffsetDateTime};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to Settings.toml file holding configuration options
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level to run with the service (default: info)
    #[arg(short, long)]
    pub level: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Settings {
    pub config: Option<String>,
    pub level: Option<String>,
    pub db_settings: DBSettings,
    pub api_settings: APISettings,
    pub ui_settings: UISettings,
    pub platform_settings: PlatformSettings,
    pub listing_settings: ListingSettings,
}

impl ConfigurableSettings for Settings {
    fn apply_cli_overrides(&mut self, cli_settings: &CliSettings) {
        if let Some(level) = &cli_settings.level {
            self.level = Some(level.clone());
        }
        if let Some(config) = &cli_settings.config {
            self.config = Some(config.clone());
        }
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("./config/local.toml")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DBSettings {
    pub data_folder: String,
    pub read_max_connections: u32,
    pub read_min_connections: u32,
    pub write_max_connections: u32,
    pub write_min_connections: u32,
    pub idle_timeout_secs: u64,
    pub acquire_timeout_secs: u64,
    pub sqlite_config: SqliteConfigSerde,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SqliteConfigSerde {
    pub mode: String,
    pub busy_timeout_ms: u32,
    pub journal_mode: String,
    pub synchronous: String,
    pub foreign_keys: bool,
}

impl Default for DBSettings {
    fn default() -> Self {
        DBSettings {
            data_folder: String::from("./data"),
            read_max_connections: 4,
            read_min_connections: 1,
            write_max_connections: 1,
            write_min_connections: 1,
            idle_timeout_secs: 600,   // 10 minutes
            acquire_timeout_secs: 15, // 15 seconds
            sqlite_config: SqliteConfigSerde::default(),
        }
    }
}

impl Default for SqliteConfigSerde {
    fn default() -> Self {
        Self {
            mode: "ReadWriteCreate".to_string(),
            busy_timeout_ms: 5000,
            journal_mode: "WAL".to_string(),
            synchronous: "NORMAL".to_string(),
            foreign_keys: true,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlatformSettings {
    /// Url of the finfun platform REST api
    pub base_url: String,
    /// Seconds to wait on a single platform request before giving up
    pub request_timeout_secs: u64,
    /// Wallet that receives competition entry fees
    pub deposit_address: String,
    /// Public app url used to build referral share links
    pub share_base_url: String,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        PlatformSettings {
            base_url: String::from("https://dev-api.finfun.xyz"),
            request_timeout_secs: 20,
            deposit_address: String::from("GrV4Nfr9pMnp2DvG8WJPSyXqJyWxFTvvyr4SnQbY5Mhz"),
            share_base_url: String::from("https://app.finfun.xyz"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListingSettings {
    /// How often the listing's lifecycle state and countdowns are recomputed
    pub tick_interval_ms: u64,
    /// When true the "Live Now" tab only shows competitions with open registration,
    /// otherwise it shows every competition
    pub strict_live_tab: bool,
}

impl Default for ListingSettings {
    fn default() -> Self {
        ListingSettings {
            tick_interval_ms: 1000,
            strict_live_tab: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UISettings {
    pub remote_url: String,
    pub ui_dir: String,
}

impl Default for UISettings {
    fn default() -> Self {
        UISettings {
            remote_url: String::from("http://127.0.0.1:9990"),
            ui_dir: String::from("./crates/public_ui"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct APISettings {
    pub domain: String,
    pub port: String,
    pub origins: Vec<String>,
}

impl Default for APISettings {
    fn default() -> Self {
        APISettings {
            domain: String::from("127.0.0.1"),
            port: String::from("9990"),
            origins: vec![String::from("http://localhost:9990")],
        }
    }
}

pub fn get_settings() -> Result<Settings, anyhow::Error> {
    get_settings_with_cli(Cli::parse().into())
}

pub struct CliSettings {
    pub config: Option<String>,
    pub level: Option<String>,
}

impl From<Cli> for CliSettings {
    fn from(cli: Cli) -> Self {
        Self {
            config: cli.config,
            level: cli.level,
        }
    }
}

pub trait ConfigurableSettings: Serialize + for<'de> Deserialize<'de> + Default {
    /// Apply CLI settings after loading from file
    fn apply_cli_overrides(&mut self, cli_settings: &CliSettings);

    /// Get the default config file path
    fn default_config_path() -> PathBuf {
        PathBuf::from("./config/settings.toml")
    }

    /// Get the config directory path
    fn config_directory() -> PathBuf {
        PathBuf::from("./config")
    }
}

fn read_settings<T: ConfigurableSettings>(mut file: File) -> Result<T, anyhow::Error> {
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| anyhow!("Failed to read config: {}", e))?;
    toml::from_str(&content).map_err(|e| anyhow!("Failed to map config to settings: {}", e))
}

pub fn get_settings_with_cli<T: ConfigurableSettings>(
    cli_settings: CliSettings,
) -> Result<T, anyhow::Error> {
    let mut settings = if let Some(config_path) = cli_settings.config.clone() {
        let path = PathBuf::from(config_path);

        let absolute_path = if path.is_absolute() {
            path
        } else {
            env::current_dir()?.join(path)
        };

        match File::open(absolute_path) {
            Ok(file) => read_settings(file)?,
            Err(err) => return Err(anyhow!("Failed to find file: {}", err)),
        }
    } else {
        let default_path = T::default_config_path();
        match File::open(&default_path) {
            Ok(file) => read_settings(file)?,
            Err(_) => {
                let default_settings = T::default();

                fs::create_dir_all(T::config_directory())
                    .map_err(|e| anyhow!("Failed to create config directory: {}", e))?;

                let toml_content = toml::to_string(&default_settings)
                    .map_err(|e| anyhow!("Failed to serialize default settings: {}", e))?;

                let mut file = fs::File::create(&default_path)
                    .map_err(|e| anyhow!("Failed to create config file: {}", e))?;
                file.write_all(toml_content.as_bytes())
                    .map_err(|e| anyhow!("Failed to write default config: {}", e))?;

                default_settings
            }
        }
    };

    settings.apply_cli_overrides(&cli_settings);

    Ok(settings)
}

pub fn setup_logger(
    level: Option<String>,
    filter_targets: Vec<String>,
) -> Result<(), fern::InitError> {
    let rust_log = get_log_level(level);
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let timestamp = OffsetDateTime::now_utc()
                .format(&Iso8601::DEFAULT)
                .unwrap_or_default();
            out.finish(format_args!(
                "[{} {}] {}: {}",
                timestamp,
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .level(rust_log)
        .filter(move |metadata| {
            !filter_targets
                .iter()
                .any(|filter| metadata.target().starts_with(filter))
        })
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

pub fn get_log_level(level: Option<String>) -> LevelFilter {
    match level {
        Some(level) => parse_level(&level),
        None => parse_level(&env::var("RUST_LOG").unwrap_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_round_trip_through_toml() {
        let settings = Settings::default();
        let content = toml::to_string(&settings).unwrap();
        let parsed: Settings = toml::from_str(&content).unwrap();

        assert_eq!(parsed.listing_settings.tick_interval_ms, 1000);
        assert!(!parsed.listing_settings.strict_live_tab);
        assert_eq!(parsed.platform_settings.base_url, "https://dev-api.finfun.xyz");
        assert_eq!(parsed.api_settings.port, "9990");
    }

    #[test]
    fn test_cli_level_overrides_file() {
        let mut settings = Settings {
            level: Some("info".to_string()),
            ..Default::default()
        };
        settings.apply_cli_overrides(&CliSettings {
            config: None,
            level: Some("debug".to_string()),
        });
        assert_eq!(settings.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(get_log_level(Some("warn".to_string())), LevelFilter::Warn);
        assert_eq!(get_log_level(Some("DEBUG".to_string())), LevelFilter::Debug);
        assert_eq!(get_log_level(Some("chatty".to_string())), LevelFilter::Info);
    }
}
