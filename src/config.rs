//! Configuration management for RAX Auth Server
//!
//! Loads `config.toml` with `RAX_AUTH_*` environment overrides. Everything
//! here is read once at startup.

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::auth::InputLimits;

/// Complete server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(flatten)]
    pub startup: StartupConfig,

    /// Users registered when the server starts
    #[serde(default)]
    pub users: Vec<SeedUser>,
}

/// Network and input limits
#[derive(Debug, Deserialize, Clone)]
pub struct StartupConfig {
    // ═══ NETWORK (Environment Override Supported) ═══
    /// IP address to bind the control connection
    pub bind_address: String,

    /// Port for the control connection, 0 picks a free port
    pub control_port: u16,

    /// Maximum concurrent clients
    /// Environment: RAX_AUTH_MAX_CLIENTS
    pub max_clients: usize,

    // ═══ INPUT LIMITS (TOML Only) ═══
    pub max_command_length: usize,
    pub max_username_length: usize,
    pub max_password_length: usize,
}

/// A user to register at startup
#[derive(Debug, Deserialize, Clone)]
pub struct SeedUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            control_port: 2323,
            max_clients: 10,
            max_command_length: 512,
            max_username_length: 32,
            max_password_length: 128,
        }
    }
}

impl ServerConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_paths = [
            "rax-auth-server/config", // Docker production: /app/rax-auth-server/config.toml
            "config",                 // Local development: ./config.toml
        ];

        let mut last_error = None;

        for config_path in &config_paths {
            match Self::build(File::with_name(config_path)) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    last_error = Some(e);
                    continue;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            config::ConfigError::Message(format!(
                "Failed to load config.toml from any location. Tried: {config_paths:?}"
            ))
        }))
    }

    /// Parse configuration from a TOML string, still honouring environment overrides
    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        Self::build(File::from_str(toml, FileFormat::Toml))
    }

    fn build<T>(file: T) -> Result<Self, config::ConfigError>
    where
        T: config::Source + Send + Sync + 'static,
    {
        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("RAX_AUTH").try_parsing(true))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.startup.bind_address.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "bind_address cannot be empty".into(),
            ));
        }

        if self.startup.max_clients == 0 {
            return Err(config::ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        if self.startup.max_command_length == 0
            || self.startup.max_username_length == 0
            || self.startup.max_password_length == 0
        {
            return Err(config::ConfigError::Message(
                "length limits must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

impl StartupConfig {
    /// Get bind address and control port as socket address
    pub fn control_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.control_port)
    }

    pub fn input_limits(&self) -> InputLimits {
        InputLimits {
            max_username_length: self.max_username_length,
            max_password_length: self.max_password_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = r#"
bind_address = "127.0.0.1"
control_port = 0
max_clients = 4
max_command_length = 256
max_username_length = 16
max_password_length = 64
"#;

    #[test]
    fn test_parse_without_users() {
        let config = ServerConfig::from_toml_str(BASE).unwrap();
        assert_eq!(config.startup.max_clients, 4);
        assert_eq!(config.startup.control_socket(), "127.0.0.1:0");
        assert_eq!(config.startup.input_limits().max_username_length, 16);
        assert!(config.users.is_empty());
    }

    #[test]
    fn test_parse_seed_users() {
        let toml = format!(
            r#"{BASE}
[[users]]
username = "alice"
email = "alice@example.com"
password = "secret1"
"#
        );
        let config = ServerConfig::from_toml_str(&toml).unwrap();
        assert_eq!(config.users.len(), 1);
        assert_eq!(config.users[0].username, "alice");
    }

    #[test]
    fn test_rejects_zero_max_clients() {
        let toml = BASE.replace("max_clients = 4", "max_clients = 0");
        assert!(ServerConfig::from_toml_str(&toml).is_err());
    }

    #[test]
    fn test_rejects_missing_field() {
        let toml = BASE.replace("max_command_length = 256", "");
        assert!(ServerConfig::from_toml_str(&toml).is_err());
    }
}
