use serde::Serialize;
use std::env;
use thiserror::Error;

#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub filter: FilterConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterConfig {
    /// Upper bound applied to every client-supplied `limit`.
    pub max_limit: i64,
    pub debug_logging: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
    pub enable_query_logging: bool,
    pub slow_query_threshold_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub admin_role: String,
    pub cors_origins: Vec<String>,
    pub jwt_expiry_hours: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EmailProvider {
    Log,
    Http,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailConfig {
    pub provider: EmailProvider,
    pub api_url: String,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub from_address: String,
    /// Public URL of the web client, used for links inside emails.
    pub app_url: String,
    /// Upper bound on one send, covering both the HTTP client and the handler wait.
    pub timeout_secs: u64,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set")]
    MissingJwtSecret,

    #[error("FILTER_MAX_LIMIT must be at least 1, got {0}")]
    InvalidMaxLimit(i64),

    #[error("EMAIL_API_KEY must be set when EMAIL_PROVIDER=http")]
    MissingEmailApiKey,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Environment defaults first, then specific env vars on top
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingJwtSecret);
        }
        if self.filter.max_limit < 1 {
            return Err(ConfigError::InvalidMaxLimit(self.filter.max_limit));
        }
        if self.email.provider == EmailProvider::Http && self.email.api_key.is_empty() {
            return Err(ConfigError::MissingEmailApiKey);
        }
        Ok(())
    }

    fn with_env_overrides(mut self) -> Self {
        // Filter overrides
        if let Ok(v) = env::var("FILTER_MAX_LIMIT") {
            self.filter.max_limit = v.parse().unwrap_or(self.filter.max_limit);
        }
        if let Ok(v) = env::var("FILTER_DEBUG_LOGGING") {
            self.filter.debug_logging = v.parse().unwrap_or(self.filter.debug_logging);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout_secs = v.parse().unwrap_or(self.database.connection_timeout_secs);
        }
        if let Ok(v) = env::var("DATABASE_ENABLE_QUERY_LOGGING") {
            self.database.enable_query_logging = v.parse().unwrap_or(self.database.enable_query_logging);
        }
        if let Ok(v) = env::var("DATABASE_SLOW_QUERY_THRESHOLD_MS") {
            self.database.slow_query_threshold_ms = v.parse().unwrap_or(self.database.slow_query_threshold_ms);
        }

        // API overrides
        if let Some(port) = env::var("SHARPLINE_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_ADMIN_ROLE") {
            self.security.admin_role = v;
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }

        // Email overrides
        if let Ok(v) = env::var("EMAIL_PROVIDER") {
            self.email.provider = match v.to_ascii_lowercase().as_str() {
                "http" => EmailProvider::Http,
                "log" => EmailProvider::Log,
                _ => self.email.provider,
            };
        }
        if let Ok(v) = env::var("EMAIL_API_URL") {
            self.email.api_url = v;
        }
        if let Ok(v) = env::var("EMAIL_API_KEY") {
            self.email.api_key = v;
        }
        if let Ok(v) = env::var("EMAIL_FROM") {
            self.email.from_address = v;
        }
        if let Ok(v) = env::var("APP_URL") {
            self.email.app_url = v;
        }
        if let Ok(v) = env::var("EMAIL_TIMEOUT_SECS") {
            self.email.timeout_secs = v.parse().unwrap_or(self.email.timeout_secs);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            filter: FilterConfig {
                max_limit: 100,
                debug_logging: true,
            },
            database: DatabaseConfig {
                url: "postgres://localhost:5432/sharpline".to_string(),
                max_connections: 5,
                connection_timeout_secs: 30,
                enable_query_logging: true,
                slow_query_threshold_ms: 100,
            },
            api: ApiConfig { port: 3000 },
            security: SecurityConfig {
                jwt_secret: String::new(),
                admin_role: "admin".to_string(),
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                jwt_expiry_hours: 24 * 7,
            },
            email: EmailConfig {
                provider: EmailProvider::Log,
                api_url: "https://api.resend.com/emails".to_string(),
                api_key: String::new(),
                from_address: "Sharpline <no-reply@localhost>".to_string(),
                app_url: "http://localhost:5173".to_string(),
                timeout_secs: 5,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            filter: FilterConfig {
                max_limit: 100,
                debug_logging: false,
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 10,
                connection_timeout_secs: 10,
                enable_query_logging: true,
                slow_query_threshold_ms: 500,
            },
            api: ApiConfig { port: 3000 },
            security: SecurityConfig {
                jwt_secret: String::new(),
                admin_role: "admin".to_string(),
                cors_origins: vec!["https://staging.sharpline.app".to_string()],
                jwt_expiry_hours: 24,
            },
            email: EmailConfig {
                provider: EmailProvider::Http,
                api_url: "https://api.resend.com/emails".to_string(),
                api_key: String::new(),
                from_address: "Sharpline <no-reply@staging.sharpline.app>".to_string(),
                app_url: "https://staging.sharpline.app".to_string(),
                timeout_secs: 5,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            filter: FilterConfig {
                max_limit: 100,
                debug_logging: false,
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 20,
                connection_timeout_secs: 5,
                enable_query_logging: false,
                slow_query_threshold_ms: 1000,
            },
            api: ApiConfig { port: 3000 },
            security: SecurityConfig {
                jwt_secret: String::new(),
                admin_role: "admin".to_string(),
                cors_origins: vec!["https://sharpline.app".to_string()],
                jwt_expiry_hours: 4,
            },
            email: EmailConfig {
                provider: EmailProvider::Http,
                api_url: "https://api.resend.com/emails".to_string(),
                api_key: String::new(),
                from_address: "Sharpline <no-reply@sharpline.app>".to_string(),
                app_url: "https://sharpline.app".to_string(),
                timeout_secs: 5,
            },
        }
    }

    /// Development defaults with a fixed secret, for tests and local tooling.
    pub fn for_tests(jwt_secret: impl Into<String>) -> Self {
        let mut config = Self::development();
        config.security.jwt_secret = jwt_secret.into();
        config.filter.debug_logging = false;
        config
    }
}
