use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    fn from_env() -> Self {
        match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Wraps the router in a tower-http trace layer
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL URL; `None` selects the in-memory store
    pub url: Option<String>,
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection
    pub connection_timeout: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    /// Allowed origins; empty or `*` allows any
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub bcrypt_cost: u32,
}

impl AppConfig {
    /// Preset for `APP_ENV`, then per-key environment overrides
    pub fn from_env() -> Self {
        Self::preset(Environment::from_env()).with_env_overrides()
    }

    pub fn development() -> Self {
        Self::preset(Environment::Development)
    }

    pub fn production() -> Self {
        Self::preset(Environment::Production)
    }

    pub fn preset(environment: Environment) -> Self {
        let (max_connections, connection_timeout, max_request_mb, bcrypt_cost, origins) = match environment {
            Environment::Development => (
                10,
                30,
                10,
                // bcrypt's minimum; keeps local logins and the test suite fast
                4,
                vec!["http://localhost:3000", "http://localhost:5173"],
            ),
            Environment::Staging => (20, 10, 5, 10, vec!["https://staging.blog.example.com"]),
            Environment::Production => (50, 5, 2, 12, vec!["https://blog.example.com"]),
        };
        let production = environment == Environment::Production;

        Self {
            environment,
            server: ServerConfig {
                port: 3000,
                enable_request_logging: !production,
                max_request_size_bytes: max_request_mb * 1024 * 1024,
            },
            database: DatabaseConfig {
                url: None,
                max_connections,
                connection_timeout,
                run_migrations: !production,
            },
            cors: CorsConfig {
                enabled: true,
                origins: origins.into_iter().map(String::from).collect(),
            },
            auth: AuthConfig { bcrypt_cost },
        }
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                self.database.url = Some(url);
            }
        }
        override_from_env("DATABASE_MAX_CONNECTIONS", &mut self.database.max_connections);
        override_from_env("DATABASE_CONNECTION_TIMEOUT", &mut self.database.connection_timeout);
        override_from_env("DATABASE_RUN_MIGRATIONS", &mut self.database.run_migrations);

        override_from_env("PORT", &mut self.server.port);
        override_from_env("API_PORT", &mut self.server.port);
        override_from_env("API_ENABLE_REQUEST_LOGGING", &mut self.server.enable_request_logging);
        override_from_env("API_MAX_REQUEST_SIZE_BYTES", &mut self.server.max_request_size_bytes);

        override_from_env("SECURITY_ENABLE_CORS", &mut self.cors.enabled);
        if let Ok(origins) = env::var("SECURITY_CORS_ORIGINS") {
            self.cors.origins = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        override_from_env("SECURITY_BCRYPT_COST", &mut self.auth.bcrypt_cost);

        self
    }
}

/// Replace `target` when `key` is set and parses; otherwise keep the preset
fn override_from_env<T: FromStr>(key: &str, target: &mut T) {
    let Ok(raw) = env::var(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *target = value,
        Err(_) => tracing::warn!("Ignoring unparseable {}='{}'", key, raw),
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        $crate::config::CONFIG.environment == $crate::config::Environment::Production
    };
}
