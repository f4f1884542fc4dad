//! Configuration for the RESP3 decoder and the `resp3-inspect` tool.
//!
//! Supports both command-line arguments and TOML configuration file.
//! CLI arguments take precedence over config file values.

use crate::protocols::resp3::MAX_DEPTH;
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

/// Command-line arguments for the inspect tool
#[derive(Parser, Debug)]
#[command(name = "resp3-inspect")]
#[command(author = "resp3-token authors")]
#[command(version = "0.1.0")]
#[command(about = "Decode a RESP3 byte stream and print its values", long_about = None)]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// File holding raw RESP3 replies (reads stdin when omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Print raw token bytes instead of decoded values
    #[arg(long)]
    pub raw: bool,

    /// Bytes handed to the decoder per read
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Maximum aggregate nesting depth
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Maximum bytes buffered while waiting for a complete token
    #[arg(long)]
    pub max_buffer_size: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// TOML configuration file structure
#[derive(Debug, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub decoder: DecoderConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Decoder limits
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Maximum aggregate nesting depth
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Maximum bytes buffered while waiting for a complete token
    #[serde(default = "default_max_buffer_size")]
    pub max_buffer_size: usize,
    /// Bytes read from the source per delivery
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_buffer_size: default_max_buffer_size(),
            chunk_size: default_chunk_size(),
        }
    }
}

/// Input source configuration
#[derive(Debug, Deserialize, Default)]
pub struct InputConfig {
    /// File to decode
    pub path: Option<PathBuf>,
    /// Print raw token bytes
    #[serde(default)]
    pub raw: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_max_depth() -> usize {
    MAX_DEPTH
}

fn default_max_buffer_size() -> usize {
    512 * 1024 * 1024 // 512 MB, the largest bulk reply a Redis server sends
}

fn default_chunk_size() -> usize {
    16 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Final resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub input: Option<PathBuf>,
    pub raw: bool,
    pub decoder: DecoderConfig,
    pub log_level: String,
}

impl Config {
    /// Load configuration from CLI args and optional TOML file.
    /// CLI arguments take precedence over TOML file values.
    pub fn load() -> Result<Self, ConfigError> {
        Config::from_args(CliArgs::parse())
    }

    pub fn from_args(cli: CliArgs) -> Result<Self, ConfigError> {
        // Load TOML config if specified
        let toml_config = if let Some(ref config_path) = cli.config {
            let contents = std::fs::read_to_string(config_path)
                .map_err(|e| ConfigError::FileRead(config_path.clone(), e))?;
            toml::from_str(&contents)
                .map_err(|e| ConfigError::TomlParse(config_path.clone(), e))?
        } else {
            TomlConfig::default()
        };

        let decoder = DecoderConfig {
            max_depth: cli.max_depth.unwrap_or(toml_config.decoder.max_depth),
            max_buffer_size: cli
                .max_buffer_size
                .unwrap_or(toml_config.decoder.max_buffer_size),
            chunk_size: cli.chunk_size.unwrap_or(toml_config.decoder.chunk_size),
        };

        if decoder.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be greater than zero"));
        }

        // Merge CLI args with TOML config (CLI takes precedence)
        Ok(Config {
            input: cli.input.or(toml_config.input.path),
            raw: cli.raw || toml_config.input.raw,
            decoder,
            log_level: if cli.log_level != "info" {
                cli.log_level
            } else {
                toml_config.logging.level
            },
        })
    }
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    FileRead(PathBuf, std::io::Error),
    TomlParse(PathBuf, toml::de::Error),
    Invalid(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileRead(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::TomlParse(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
