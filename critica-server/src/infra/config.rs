//! Environment-driven configuration.

use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing key for access tokens; also salts confirmation codes.
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let host = env::var("CRITICA_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("CRITICA_PORT") {
            Ok(raw) => raw.parse().context("CRITICA_PORT must be a port number")?,
            Err(_) => 8080,
        };

        let url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let max_connections = match env::var("CRITICA_DB_POOL") {
            Ok(raw) => raw.parse().context("CRITICA_DB_POOL must be a number")?,
            Err(_) => 5,
        };

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        let token_ttl_secs = match env::var("CRITICA_TOKEN_TTL_SECS") {
            Ok(raw) => raw
                .parse()
                .context("CRITICA_TOKEN_TTL_SECS must be a number of seconds")?,
            Err(_) => 24 * 60 * 60,
        };

        Ok(Self {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url,
                max_connections,
            },
            auth: AuthConfig {
                jwt_secret,
                token_ttl_secs,
            },
        })
    }
}
