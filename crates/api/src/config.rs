//! Application configuration loaded from environment variables.

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `DATABASE_URL` — Postgres connection string; absent means the
///   in-memory store
/// - `PAYMENT_KEY_SECRET` — shared secret for payment signature
///   verification (default: `"dev-secret"`, for development only)
/// - `OPERATOR_EMAIL` — recipient of new-order alerts
/// - `CURRENCY` — ISO currency code for gateway sessions (default:
///   `"INR"`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub payment_secret: String,
    pub operator_email: String,
    pub currency: String,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_url: std::env::var("DATABASE_URL").ok(),
            payment_secret: std::env::var("PAYMENT_KEY_SECRET")
                .unwrap_or_else(|_| "dev-secret".to_string()),
            operator_email: std::env::var("OPERATOR_EMAIL")
                .unwrap_or_else(|_| "operator@example.com".to_string()),
            currency: std::env::var("CURRENCY").unwrap_or_else(|_| "INR".to_string()),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: None,
            payment_secret: "dev-secret".to_string(),
            operator_email: "operator@example.com".to_string(),
            currency: "INR".to_string(),
            log_level: "info".to_string(),
        }
    }
}
