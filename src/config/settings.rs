//! Application settings loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use super::constants::{
    DEFAULT_ACCESS_TOKEN_MINUTES, DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD,
    DEFAULT_CORS_ORIGINS, DEFAULT_DATABASE_URL, DEFAULT_DB_ACQUIRE_TIMEOUT_SECS,
    DEFAULT_DB_CONNECT_TIMEOUT_SECS, DEFAULT_DB_MAX_CONNECTIONS, DEFAULT_REFRESH_TOKEN_DAYS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    MIN_JWT_SECRET_LENGTH,
};

const DEV_ACCESS_SECRET: &str = "dev-access-secret-minimum-32-chars!!";
const DEV_REFRESH_SECRET: &str = "dev-refresh-secret-minimum-32-chars!";

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// Redis is optional; without it rate limiting is disabled.
    pub redis_url: Option<String>,
    jwt_secret: String,
    refresh_secret: String,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
    pub server_host: String,
    pub server_port: u16,
    pub db_max_connections: u32,
    pub db_connect_timeout: Duration,
    pub db_acquire_timeout: Duration,
    pub request_timeout: Duration,
    pub cors_origins: Vec<String>,
    pub secure_cookies: bool,
    pub admin_email: String,
    admin_password: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[REDACTED]"))
            .field("jwt_secret", &"[REDACTED]")
            .field("refresh_secret", &"[REDACTED]")
            .field("access_token_minutes", &self.access_token_minutes)
            .field("refresh_token_days", &self.refresh_token_days)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("db_max_connections", &self.db_max_connections)
            .field("request_timeout", &self.request_timeout)
            .field("cors_origins", &self.cors_origins)
            .field("secure_cookies", &self.secure_cookies)
            .field("admin_email", &self.admin_email)
            .finish()
    }
}

/// Development defaults. Secrets here are only acceptable outside release builds.
impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: None,
            jwt_secret: DEV_ACCESS_SECRET.to_string(),
            refresh_secret: DEV_REFRESH_SECRET.to_string(),
            access_token_minutes: DEFAULT_ACCESS_TOKEN_MINUTES,
            refresh_token_days: DEFAULT_REFRESH_TOKEN_DAYS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            db_connect_timeout: Duration::from_secs(DEFAULT_DB_CONNECT_TIMEOUT_SECS),
            db_acquire_timeout: Duration::from_secs(DEFAULT_DB_ACQUIRE_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
            secure_cookies: false,
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if a token secret is missing in a release build or is too short.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let jwt_secret = secret_var("JWT_SECRET", &defaults.jwt_secret);
        let refresh_secret = secret_var("REFRESH_TOKEN_SECRET", &defaults.refresh_secret);

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            jwt_secret,
            refresh_secret,
            access_token_minutes: parsed_var("ACCESS_TOKEN_EXPIRES_MINUTES")
                .unwrap_or(defaults.access_token_minutes),
            refresh_token_days: parsed_var("REFRESH_TOKEN_EXPIRES_DAYS")
                .unwrap_or(defaults.refresh_token_days),
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parsed_var("SERVER_PORT").unwrap_or(defaults.server_port),
            db_max_connections: parsed_var("DB_MAX_CONNECTIONS")
                .unwrap_or(defaults.db_max_connections),
            db_connect_timeout: parsed_var("DB_CONNECT_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.db_connect_timeout),
            db_acquire_timeout: parsed_var("DB_ACQUIRE_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.db_acquire_timeout),
            request_timeout: parsed_var("REQUEST_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            secure_cookies: parsed_var("COOKIE_SECURE").unwrap_or(!cfg!(debug_assertions)),
            admin_email: env::var("ADMIN_EMAIL").unwrap_or(defaults.admin_email),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
        }
    }

    /// Secret used to sign and verify access tokens.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Secret used to sign and verify refresh tokens.
    pub fn refresh_secret_bytes(&self) -> &[u8] {
        self.refresh_secret.as_bytes()
    }

    /// Password for the administrator seeded on startup.
    pub fn admin_password(&self) -> &str {
        &self.admin_password
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parsed_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

fn secret_var(key: &str, dev_default: &str) -> String {
    let secret = env::var(key).unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            tracing::warn!("{} not set, using insecure default for development", key);
            dev_default.to_string()
        } else {
            panic!("{} environment variable must be set in production", key);
        }
    });

    if secret.len() < MIN_JWT_SECRET_LENGTH {
        panic!(
            "{} must be at least {} characters long",
            key, MIN_JWT_SECRET_LENGTH
        );
    }

    secret
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_secrets() {
        let rendered = format!("{:?}", Config::default());
        assert!(!rendered.contains(DEV_ACCESS_SECRET));
        assert!(!rendered.contains(DEV_REFRESH_SECRET));
        assert!(!rendered.contains(DEFAULT_ADMIN_PASSWORD));
    }

    #[test]
    fn default_secrets_meet_minimum_length() {
        let config = Config::default();
        assert!(config.jwt_secret_bytes().len() >= MIN_JWT_SECRET_LENGTH);
        assert!(config.refresh_secret_bytes().len() >= MIN_JWT_SECRET_LENGTH);
        assert_ne!(config.jwt_secret_bytes(), config.refresh_secret_bytes());
    }
}
