/// Configuration management for the API server
///
/// Loads configuration from environment variables into a type-safe struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `API_HOST`: host to bind to (default: 0.0.0.0)
/// - `API_PORT`: port to bind to (default: 8080)
/// - `APP_ENV`: "production" enables strict transport headers (default: development)
/// - `CORS_ORIGINS`: comma-separated allowed origins ("*" = permissive, default)
/// - `TOKEN_TTL_SECONDS`: bearer-token lifetime; unset = tokens never expire
/// - `APP_NAME`: name used in outbound mail subjects (default: Taskmate)
/// - `MAIL_RELAY_URL`: HTTP mail relay endpoint; unset = log-only mailer
/// - `MAIL_FROM_ADDRESS`: sender address (default: noreply@taskmate.local)
/// - `RUST_LOG`: log filter (default: info)

use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Auth configuration
    pub auth: AuthConfig,

    /// Outbound mail configuration
    pub mail: MailConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Whether the server runs in production mode
    pub production: bool,

    /// Allowed CORS origins; ["*"] means permissive (development)
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Auth configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Bearer-token lifetime in seconds (None = tokens never expire)
    pub token_ttl_seconds: Option<i64>,
}

/// Outbound mail configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Application name used in mail subjects
    pub app_name: String,

    /// HTTP mail relay endpoint (None = log-only mailer)
    pub relay_url: Option<String>,

    /// Sender address
    pub from_address: String,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing or values fail to
    /// parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let production = env::var("APP_ENV")
            .map(|value| value == "production")
            .unwrap_or(false);

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let token_ttl_seconds = match env::var("TOKEN_TTL_SECONDS") {
            Ok(value) => Some(value.parse::<i64>()?),
            Err(_) => None,
        };

        let app_name = env::var("APP_NAME").unwrap_or_else(|_| "Taskmate".to_string());
        let relay_url = env::var("MAIL_RELAY_URL").ok();
        let from_address = env::var("MAIL_FROM_ADDRESS")
            .unwrap_or_else(|_| "noreply@taskmate.local".to_string());

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                production,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            auth: AuthConfig { token_ttl_seconds },
            mail: MailConfig {
                app_name,
                relay_url,
                from_address,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
