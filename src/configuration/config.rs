use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use clap::Parser;
use log::debug;
use serde::Deserialize;

use crate::error_handling::types::ConfigError;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://todo.sqlite3?mode=rwc";
pub const DEFAULT_PAGE_TITLE: &str = "Todo Web App";

/// Application configuration structure that defines all runtime parameters.
///
/// Values come either from the command line (with environment variable
/// fallbacks) or, when `--config` is given, from a TOML file. Every field has a
/// default so the server starts with no arguments at all.
///
/// # Examples
///
/// ```no_run
/// use todo_web::configuration::Config;
///
/// let config = Config::from_args();
/// println!("Listening on: {}", config.socket_addr().unwrap());
/// ```
///
/// # Fields Overview
///
/// - `bind_address`: IP address the HTTP server binds to
/// - `port`: TCP port the HTTP server listens on
/// - `database_url`: connection URL of the todo store, or `memory:`
/// - `page_title`: heading shown on the list page
/// - `template_path`: page template read from disk instead of the built-in one
/// - `reload_template`: re-read the template on every request
#[derive(Parser, Deserialize, Debug, Clone, PartialEq)]
#[command(name = "todo-web")]
#[command(version)]
#[command(about = "A minimal web-based todo list")]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// TOML configuration file. When given, it replaces every other flag.
    #[arg(long = "config", value_name = "FILE")]
    #[serde(skip)]
    pub config_file: Option<PathBuf>,

    /// Network address to bind the server to.
    #[arg(long, env = "TODO_BIND_ADDRESS", default_value = DEFAULT_BIND_ADDRESS)]
    pub bind_address: String,

    /// Port on which to serve the todo pages.
    #[arg(long, env = "TODO_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Database connection URL.
    ///
    /// Any URL SeaORM understands for the compiled-in drivers, or `memory:`
    /// for a store that lives only as long as the process.
    #[arg(long, env = "TODO_DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// Title rendered at the top of the list page.
    #[arg(long, default_value = DEFAULT_PAGE_TITLE)]
    pub page_title: String,

    /// Page template file used instead of the embedded one.
    #[arg(long, value_name = "FILE")]
    pub template_path: Option<PathBuf>,

    /// Re-read and recompile the template file on every request.
    ///
    /// Meant for editing a template while the server runs. Has no effect
    /// without `template_path`.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub reload_template: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_file: None,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            page_title: DEFAULT_PAGE_TITLE.to_string(),
            template_path: None,
            reload_template: false,
        }
    }
}

impl Config {
    /// Parses the configuration from the process command line.
    ///
    /// # Panics
    /// Exits the process with a usage message if the arguments are invalid,
    /// as `clap` does.
    pub fn from_args() -> Self {
        Config::parse()
    }

    /// Reads a TOML configuration file. Keys that are absent take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::FileDoesNotExist(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TomlError(e.to_string()))
    }

    /// Resolves the effective configuration: the file named by `--config` if
    /// any, the parsed flags otherwise. The result is validated.
    pub fn resolve(self) -> Result<Self, ConfigError> {
        let config = match &self.config_file {
            Some(path) => Self::from_file(path)?,
            None => self,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_address
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::BadIPFormatting(self.bind_address.clone()))?;
        if self.port == 0 {
            return Err(ConfigError::NotInRange(
                "port must be between 1 and 65535".to_string(),
            ));
        }
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::EmptyValue("database_url".to_string()));
        }
        if let Some(path) = &self.template_path {
            if !path.is_file() {
                return Err(ConfigError::FileDoesNotExist(path.display().to_string()));
            }
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .bind_address
            .parse()
            .map_err(|_| ConfigError::BadIPFormatting(self.bind_address.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
