use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Application settings
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AppSettings {
    pub default_port: u16,
    pub connection_timeout: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_port: 22,
            connection_timeout: 20,
        }
    }
}

/// How to authenticate an SSH connection
#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum AuthMethod {
    Password(String),
    PublicKey {
        private_key_path: String,
        passphrase: Option<String>,
    },
}

/// Represents a stored SSH connection entry
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Connection {
    pub id: String,
    pub display_name: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub auth_method: AuthMethod,
    pub created_at: DateTime<Utc>,
    pub last_used: Option<DateTime<Utc>>,
}

impl Connection {
    /// Creates a new connection with the given parameters
    pub fn new(host: String, port: u16, username: String, auth_method: AuthMethod) -> Self {
        let display_name = host.clone(); // Default display name is the host
        Self {
            id: Uuid::new_v4().to_string(),
            display_name,
            host,
            port,
            username,
            auth_method,
            created_at: Utc::now(),
            last_used: None,
        }
    }

    pub fn host_port(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validates the connection parameters
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Host cannot be empty".to_string(),
            ));
        }

        if self.port == 0 {
            return Err(AppError::ValidationError(
                "Port must be greater than 0".to_string(),
            ));
        }

        if self.username.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Username cannot be empty".to_string(),
            ));
        }

        match &self.auth_method {
            AuthMethod::Password(password) => {
                if password.trim().is_empty() {
                    return Err(AppError::ValidationError(
                        "Password cannot be empty".to_string(),
                    ));
                }
            }
            AuthMethod::PublicKey {
                private_key_path, ..
            } => {
                if private_key_path.trim().is_empty() {
                    return Err(AppError::ValidationError(
                        "Private key path cannot be empty".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Updates the last used timestamp
    pub fn update_last_used(&mut self) {
        self.last_used = Some(Utc::now());
    }

    /// Sets a custom display name
    pub fn set_display_name(&mut self, name: String) {
        self.display_name = name;
    }
}

/// Main configuration structure
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    pub connections: Vec<Connection>,
    pub settings: AppSettings,
}

/// Configuration manager for handling application settings and connection storage
pub struct ConfigManager {
    config_path: PathBuf,
    config: Config,
}

impl ConfigManager {
    /// Create a new configuration manager
    pub fn new() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        let config = Self::load_config_from_path(&config_path)?;

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Create a configuration manager with a custom config path (useful for testing)
    pub fn with_path<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref().to_path_buf();
        let config = Self::load_config_from_path(&config_path)?;

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Get the default configuration file path
    fn get_config_path() -> Result<PathBuf> {
        let home_dir = std::env::var("HOME")
            .map_err(|_| AppError::ConfigError("HOME environment variable not set".to_string()))?;

        let config_dir = Path::new(&home_dir).join(".config").join("sshpick");

        // Create config directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).map_err(|e| {
                AppError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from the specified path
    fn load_config_from_path(config_path: &Path) -> Result<Config> {
        if !config_path.exists() {
            // Return default config if file doesn't exist
            return Ok(Config::default());
        }

        let config_content = fs::read_to_string(config_path)
            .map_err(|e| AppError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&config_content)
            .map_err(|e| AppError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Persist current config to disk
    pub fn save(&self) -> Result<()> {
        let toml = toml::to_string_pretty(&self.config)
            .map_err(|e| AppError::ConfigError(format!("Failed to serialize config: {}", e)))?;
        fs::write(&self.config_path, toml)
            .map_err(|e| AppError::ConfigError(format!("Failed to write config: {}", e)))?;
        Ok(())
    }

    /// Return immutable slice of connections
    pub fn connections(&self) -> &[Connection] {
        &self.config.connections
    }

    pub fn settings(&self) -> &AppSettings {
        &self.config.settings
    }

    /// Add a new connection and persist it
    pub fn add_connection(&mut self, connection: Connection) -> Result<()> {
        // Validate the connection before adding
        connection.validate()?;

        // Best-effort dedup: same host/port/username
        if !self.config.connections.iter().any(|c| {
            c.host == connection.host
                && c.port == connection.port
                && c.username == connection.username
        }) {
            self.config.connections.push(connection);
        }
        self.save()
    }

    /// Update an existing connection
    pub fn update_connection(&mut self, connection: Connection) -> Result<()> {
        // Validate the connection before updating
        connection.validate()?;

        // Find and update the connection
        if let Some(existing_conn) = self
            .config
            .connections
            .iter_mut()
            .find(|conn| conn.id == connection.id)
        {
            *existing_conn = connection;
            Ok(())
        } else {
            Err(AppError::ConfigError("Connection not found".to_string()))
        }
    }

    /// Remove a connection by ID
    pub fn remove_connection(&mut self, id: &str) -> Result<()> {
        let initial_len = self.config.connections.len();
        self.config.connections.retain(|conn| conn.id != id);

        if self.config.connections.len() == initial_len {
            Err(AppError::ConfigError("Connection not found".to_string()))
        } else {
            Ok(())
        }
    }

    /// Update last_used for a connection by id and persist
    pub fn touch_last_used(&mut self, id: &str) -> Result<()> {
        if let Some(c) = self.config.connections.iter_mut().find(|c| c.id == id) {
            c.update_last_used();
            self.save()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_deserialize_connection() {
        let conn = Connection::new(
            "test".to_string(),
            22,
            "root".to_string(),
            AuthMethod::Password("password".to_string()),
        );
        let serialized = toml::to_string(&conn).unwrap();

        let deserialized: Connection = toml::from_str(&serialized).unwrap();
        assert_eq!(conn.id, deserialized.id);
        assert_eq!(conn.host, deserialized.host);
    }

    #[test]
    fn test_add_and_reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut manager = ConfigManager::with_path(&path).unwrap();
        let conn = Connection::new(
            "example.com".to_string(),
            2222,
            "picker".to_string(),
            AuthMethod::PublicKey {
                private_key_path: "~/.ssh/id_ed25519".to_string(),
                passphrase: None,
            },
        );
        let id = conn.id.clone();
        manager.add_connection(conn).unwrap();

        let reloaded = ConfigManager::with_path(&path).unwrap();
        assert_eq!(reloaded.connections().len(), 1);
        assert_eq!(reloaded.connections()[0].id, id);
        assert_eq!(reloaded.connections()[0].port, 2222);
    }

    #[test]
    fn test_validate_rejects_empty_host() {
        let conn = Connection::new(
            "  ".to_string(),
            22,
            "root".to_string(),
            AuthMethod::Password("password".to_string()),
        );
        assert!(conn.validate().is_err());
    }
}
