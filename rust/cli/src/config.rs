use arcade_floor::{FloorSettings, GameTables, LogFormat, DEFAULT_LOG_CAPACITY, DEFAULT_STARTING_CREDITS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const CONFIG_ENV: &str = "ARCADE_CONFIG";
pub const DEFAULT_DATA_DIR: &str = ".arcade";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Config {
    pub starting_credits: u64,
    pub log_capacity: usize,
    pub seed: Option<u64>,
    pub data_dir: PathBuf,
    pub log_format: LogFormat,
    pub tables: GameTables,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub starting_credits: ValueSource,
    pub log_capacity: ValueSource,
    pub seed: ValueSource,
    pub data_dir: ValueSource,
    pub log_format: ValueSource,
    pub tables: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            starting_credits: ValueSource::Default,
            log_capacity: ValueSource::Default,
            seed: ValueSource::Default,
            data_dir: ValueSource::Default,
            log_format: ValueSource::Default,
            tables: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            starting_credits: DEFAULT_STARTING_CREDITS,
            log_capacity: DEFAULT_LOG_CAPACITY,
            seed: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_format: LogFormat::Pretty,
            tables: GameTables::default(),
        }
    }
}

impl Config {
    pub fn floor_settings(&self) -> FloorSettings {
        FloorSettings {
            starting_credits: self.starting_credits,
            log_capacity: self.log_capacity,
            seed: self.seed,
            tables: self.tables.clone(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Defaults, then the TOML file named by `ARCADE_CONFIG`, then `ARCADE_*`
/// variables. Later layers win.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.starting_credits {
            cfg.starting_credits = v;
            sources.starting_credits = ValueSource::File;
        }
        if let Some(v) = f.log_capacity {
            cfg.log_capacity = v;
            sources.log_capacity = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.data_dir {
            cfg.data_dir = v;
            sources.data_dir = ValueSource::File;
        }
        if let Some(v) = f.log_format {
            cfg.log_format = v;
            sources.log_format = ValueSource::File;
        }
        if let Some(v) = f.tables {
            cfg.tables = v;
            sources.tables = ValueSource::File;
        }
    }

    if let Ok(credits) = std::env::var("ARCADE_STARTING_CREDITS")
        && !credits.is_empty()
    {
        cfg.starting_credits = credits
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid starting credits".into()))?;
        sources.starting_credits = ValueSource::Env;
    }
    if let Ok(capacity) = std::env::var("ARCADE_LOG_CAPACITY")
        && !capacity.is_empty()
    {
        cfg.log_capacity = capacity
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid log capacity".into()))?;
        sources.log_capacity = ValueSource::Env;
    }
    if let Ok(seed) = std::env::var("ARCADE_SEED")
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid("Invalid seed".into()))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(dir) = std::env::var("ARCADE_DATA_DIR")
        && !dir.is_empty()
    {
        cfg.data_dir = PathBuf::from(dir);
        sources.data_dir = ValueSource::Env;
    }
    if let Ok(format) = std::env::var("ARCADE_LOG_FORMAT")
        && !format.is_empty()
    {
        cfg.log_format = format.parse().map_err(ConfigError::Invalid)?;
        sources.log_format = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    starting_credits: Option<u64>,
    #[serde(default)]
    log_capacity: Option<usize>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    data_dir: Option<PathBuf>,
    #[serde(default)]
    log_format: Option<LogFormat>,
    #[serde(default)]
    tables: Option<GameTables>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    cfg.floor_settings()
        .validate()
        .map_err(|e| ConfigError::Invalid(format!("Invalid configuration: {}", e)))
}
