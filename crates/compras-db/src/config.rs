//! Database configuration

use serde::{Deserialize, Serialize};

const MEMORY_URL: &str = "sqlite::memory:";

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL (`sqlite://compras.db`, `sqlite::memory:`)
    pub database_url: String,
    /// Maximum pool connections
    pub max_connections: u32,
    /// Minimum pool connections
    pub min_connections: u32,
    /// Connection acquire timeout in seconds
    pub acquire_timeout_secs: u64,
    /// How long a writer waits on a locked database before failing, in seconds
    pub busy_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://compras.db".to_string()),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_secs: 30,
            busy_timeout_secs: 5,
        }
    }
}

impl DatabaseConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: defaults.database_url,
            max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_connections),
            min_connections: std::env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.min_connections),
            acquire_timeout_secs: std::env::var("DB_ACQUIRE_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.acquire_timeout_secs),
            busy_timeout_secs: defaults.busy_timeout_secs,
        }
    }

    /// Private in-memory database.
    ///
    /// Every SQLite connection to `:memory:` opens its own database, so the
    /// pool is pinned to a single connection that is never recycled.
    pub fn in_memory() -> Self {
        Self {
            database_url: MEMORY_URL.to_string(),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_secs: 30,
            busy_timeout_secs: 5,
        }
    }

    /// Whether this configuration points at an in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_config() {
        let config = DatabaseConfig::in_memory();
        assert!(config.is_in_memory());
        assert_eq!(config.max_connections, 1);
    }

    #[test]
    fn test_file_config_is_not_in_memory() {
        let config = DatabaseConfig {
            database_url: "sqlite:///var/lib/compras/compras.db".to_string(),
            ..DatabaseConfig::in_memory()
        };
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_from_env_keeps_busy_timeout() {
        let config = DatabaseConfig::from_env();
        assert_eq!(config.busy_timeout_secs, DatabaseConfig::default().busy_timeout_secs);
        assert!(config.max_connections >= 1);
    }
}
