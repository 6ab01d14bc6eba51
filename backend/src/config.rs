use serde::{Deserialize, Serialize};
use std::{env, time::Duration};

pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://illustrious-bubblegum-77febb.netlify.app";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub db_host: String,
    pub db_port: u16,
    pub db_name: String,
    pub admin_user: String,
    pub admin_password: String,
    pub guest_user: String,
    pub guest_password: String,
    pub listen_port: u16,
    pub allowed_origin: String,
    pub pool: PoolConfig,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self::from_lookup(|key| env::var(key).ok()))
    }

    /// Resolves every setting through `lookup`, falling back to the built-in
    /// default when a key is absent or empty, or a number does not parse.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let db_port = lookup("MYSQLPORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(3306);

        let listen_port = lookup("PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);

        let defaults = PoolConfig::default();
        let max_connections = lookup("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_connections);
        let acquire_timeout = lookup("DB_ACQUIRE_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.acquire_timeout);

        Config {
            db_host: text("MYSQLHOST", "localhost"),
            db_port,
            db_name: text("MYSQLDATABASE", "4537_lab4"),
            admin_user: text("MYSQL_ADMIN_USER", "admin"),
            admin_password: text("MYSQL_ADMIN_PASSWORD", "admin_password"),
            guest_user: text("MYSQL_GUEST_USER", "guest"),
            guest_password: text("MYSQL_GUEST_PASSWORD", "guest_password"),
            listen_port,
            allowed_origin: text("ALLOWED_ORIGIN", DEFAULT_ALLOWED_ORIGIN),
            pool: PoolConfig {
                max_connections,
                acquire_timeout,
            },
        }
    }
}
