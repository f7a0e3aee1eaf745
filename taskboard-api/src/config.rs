/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `PORT`: Port to bind to (default: 3000)
/// - `DATABASE_URL`: PostgreSQL connection string (in-memory store when unset)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `AUTH_JWT_SECRET`: HS256 secret; opaque bearer tokens are accepted when unset
/// - `NOTIFICATION_WEBHOOK_URL`: Webhook for notifications (logged only when unset)
/// - `DELETION_POLICY`: `soft` or `hard` (default: soft)
/// - `CORS_ORIGINS`: Comma-separated origins, `*` for any (default: *)
/// - `TRUST_FORWARDED_FOR`: Key rate limits on `X-Forwarded-For` (default: false)
/// - `RUST_LOG`: Log filter (default: taskboard_api=debug,tower_http=debug)
///
/// # Example
///
/// ```no_run
/// use taskboard_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use std::env;
use taskboard_shared::{
    auth::token::{TokenVerifier, MIN_SECRET_LEN},
    services::DeletionPolicy,
};

/// Complete application configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration; `None` selects the in-memory store
    pub database: Option<DatabaseConfig>,

    /// Bearer token configuration
    pub auth: AuthConfig,

    /// Notification delivery configuration
    pub notifications: NotificationConfig,

    /// How user deletion behaves
    pub deletion_policy: DeletionPolicy,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins
    pub cors_origins: Vec<String>,

    /// Identify clients by `X-Forwarded-For` instead of the peer address
    ///
    /// Only enable behind a proxy that overwrites the header.
    pub trust_forwarded_for: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: vec!["*".to_string()],
            trust_forwarded_for: false,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Bearer token configuration
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// HS256 signing secret
    ///
    /// Must be at least 32 characters. Generate with: `openssl rand -hex 32`
    pub jwt_secret: Option<String>,
}

impl AuthConfig {
    /// Verifier matching the configured mode
    pub fn verifier(&self) -> TokenVerifier {
        match &self.jwt_secret {
            Some(secret) => TokenVerifier::Jwt(secret.clone()),
            None => TokenVerifier::Opaque,
        }
    }
}

/// Notification delivery configuration
#[derive(Debug, Clone, Default)]
pub struct NotificationConfig {
    /// Webhook receiving notification payloads
    pub webhook_url: Option<String>,
}

/// Reads an optional variable, treating empty values as unset
fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Numeric variables fail to parse
    /// - `AUTH_JWT_SECRET` is shorter than 32 characters
    /// - `DELETION_POLICY` is not `soft` or `hard`
    /// - `TRUST_FORWARDED_FOR` is not a boolean
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let trust_forwarded_for = match optional_var("TRUST_FORWARDED_FOR") {
            Some(raw) => parse_flag(&raw)
                .ok_or_else(|| anyhow::anyhow!("TRUST_FORWARDED_FOR must be true or false"))?,
            None => false,
        };

        let database = match optional_var("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse::<u32>()?,
            }),
            None => None,
        };

        let jwt_secret = optional_var("AUTH_JWT_SECRET");
        if let Some(secret) = &jwt_secret {
            if secret.len() < MIN_SECRET_LEN {
                anyhow::bail!("AUTH_JWT_SECRET must be at least {} characters long", MIN_SECRET_LEN);
            }
        }

        let deletion_policy = match optional_var("DELETION_POLICY") {
            Some(raw) => raw.parse::<DeletionPolicy>().map_err(anyhow::Error::msg)?,
            None => DeletionPolicy::default(),
        };

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
                trust_forwarded_for,
            },
            database,
            auth: AuthConfig { jwt_secret },
            notifications: NotificationConfig {
                webhook_url: optional_var("NOTIFICATION_WEBHOOK_URL"),
            },
            deletion_policy,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                cors_origins: vec!["*".to_string()],
                trust_forwarded_for: false,
            },
            ..Default::default()
        };

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert!(config.database.is_none());
        assert_eq!(config.deletion_policy, DeletionPolicy::Soft);
        assert!(matches!(config.auth.verifier(), TokenVerifier::Opaque));
        assert!(!config.api.trust_forwarded_for);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_verifier_follows_secret() {
        let auth = AuthConfig {
            jwt_secret: Some("test-secret-key-at-least-32-bytes-long".to_string()),
        };
        assert_eq!(auth.verifier().mode(), "jwt");
    }
}
