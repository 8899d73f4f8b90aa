//! Configuration Module
//!
//! Environment-driven configuration for the server, database, session
//! tokens, and OTP email delivery.

use sqlx::PgPool;
use std::time::Duration;

use crate::notify::smtp::SmtpSettings;
use crate::service::auth::DEFAULT_AVATAR_URL;
use crate::utils::security::DEFAULT_BCRYPT_COST;

/// Environment variable helpers
pub mod env {
    use std::env;

    /// Get environment variable as string with default
    pub fn get_string(key: &str, default: &str) -> String {
        env::var(key).unwrap_or_else(|_| default.to_string())
    }

    /// Get environment variable as u16 with default
    pub fn get_u16(key: &str, default: u16) -> u16 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as u32 with default
    pub fn get_u32(key: &str, default: u32) -> u32 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as u64 with default
    pub fn get_u64(key: &str, default: u64) -> u64 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Check if environment variable is set
    pub fn is_set(key: &str) -> bool {
        env::var(key).is_ok()
    }
}

/// Application configuration combining all service settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    /// SMTP delivery; when absent, OTP codes go to the server log
    pub email: Option<SmtpSettings>,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Process-wide session token signing key
    pub token_secret: String,
    /// bcrypt work factor for password hashing
    pub bcrypt_cost: u32,
    /// Placeholder avatar assigned to new accounts
    pub default_avatar_url: String,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let database = DatabaseConfig {
            url: std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            max_connections: env::get_u32("DB_MAX_CONNECTIONS", 20),
            connect_timeout: Duration::from_secs(env::get_u64("DB_CONNECT_TIMEOUT", 30)),
        };

        let auth = AuthConfig {
            token_secret: std::env::var("SECRET_KEY")
                .map_err(|_| anyhow::anyhow!("SECRET_KEY environment variable is required"))?,
            bcrypt_cost: env::get_u32("BCRYPT_COST", DEFAULT_BCRYPT_COST),
            default_avatar_url: env::get_string("DEFAULT_AVATAR_URL", DEFAULT_AVATAR_URL),
        };

        let email = if env::is_set("SMTP_USERNAME") && env::is_set("SMTP_PASSWORD") {
            Some(SmtpSettings {
                host: env::get_string("SMTP_HOST", "localhost"),
                port: env::get_u16("SMTP_PORT", 587),
                username: env::get_string("SMTP_USERNAME", ""),
                password: env::get_string("SMTP_PASSWORD", ""),
                from_email: env::get_string("FROM_EMAIL", "no-reply@glowcare.app"),
                from_name: env::get_string("FROM_NAME", "GlowCare"),
            })
        } else {
            None
        };

        Ok(Self {
            server: ServerConfig {
                host: env::get_string("SERVER_HOST", "0.0.0.0"),
                port: env::get_u16("PORT", 3000),
            },
            database,
            auth,
            email,
        })
    }

    /// Reject configurations that cannot work
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.auth.token_secret.trim().is_empty() {
            anyhow::bail!("SECRET_KEY must not be empty");
        }
        if self.database.url.trim().is_empty() {
            anyhow::bail!("DATABASE_URL must not be empty");
        }
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            anyhow::bail!("BCRYPT_COST must be between 4 and 31");
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Create a connection pool from this configuration
    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        sqlx::postgres::PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.connect_timeout)
            .connect(&self.url)
            .await
    }
}
