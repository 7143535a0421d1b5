//! Server configuration for the patient registry API.
//!
//! Every setting can come from a command-line flag or an environment
//! variable, and is resolved once at startup.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `REGISTRY_PORT` | 3000 | Server port |
//! | `REGISTRY_HOST` | 127.0.0.1 | Host to bind |
//! | `REGISTRY_LOG_LEVEL` | info | Log level |
//! | `REGISTRY_DATABASE_PATH` | registry.db | SQLite file, or `:memory:` |
//! | `REGISTRY_MAX_BODY_SIZE` | 1048576 | Max request body (bytes) |
//! | `REGISTRY_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `REGISTRY_ENABLE_CORS` | true | Enable CORS |
//! | `REGISTRY_CORS_ORIGINS` | * | Allowed origins |
//! | `REGISTRY_MAX_PAGE_SIZE` | 1000 | Largest accepted `pageSize` |
//! | `REGISTRY_STARTUP_ATTEMPTS` | 30 | Database checks before giving up |
//! | `REGISTRY_STARTUP_DELAY_MS` | 2000 | Pause between checks |
//! | `REGISTRY_SEED_SAMPLE_PATIENTS` | true | Insert sample patients into an empty table |
//! | `REGISTRY_AUTH_USERNAME` | VERIS | Operator user name |
//! | `REGISTRY_AUTH_PASSWORD` | PRUEBAS123 | Operator password |
//! | `REGISTRY_JWT_SECRET` | secret | HS256 signing secret |
//! | `REGISTRY_JWT_EXPIRES_IN` | 24h | Token lifetime (`30m`, `24h`, ...) |
//!
//! # Example
//!
//! ```rust
//! use registry_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 8080,
//!     host: "0.0.0.0".to_string(),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use clap::{Args, Parser};

/// Credentials and token settings for the identity gate.
#[derive(Debug, Clone, Args)]
pub struct AuthConfig {
    /// The single operator allowed to log in.
    #[arg(long = "auth-username", env = "REGISTRY_AUTH_USERNAME", default_value = "VERIS")]
    pub username: String,

    /// The operator's password.
    #[arg(
        long = "auth-password",
        env = "REGISTRY_AUTH_PASSWORD",
        default_value = "PRUEBAS123",
        hide_env_values = true
    )]
    pub password: String,

    /// Secret used to sign and verify tokens.
    #[arg(
        long = "jwt-secret",
        env = "REGISTRY_JWT_SECRET",
        default_value = "secret",
        hide_env_values = true
    )]
    pub jwt_secret: String,

    /// Token lifetime.
    #[arg(
        long = "jwt-expires-in",
        env = "REGISTRY_JWT_EXPIRES_IN",
        default_value = "24h",
        value_parser = humantime::parse_duration
    )]
    pub token_ttl: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: "VERIS".to_string(),
            password: "PRUEBAS123".to_string(),
            jwt_secret: "secret".to_string(),
            token_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Server configuration for the patient registry API.
#[derive(Debug, Clone, Parser)]
#[command(name = "patient-registry")]
#[command(about = "Patient registry HTTP API")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "REGISTRY_PORT", default_value = "3000")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "REGISTRY_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "REGISTRY_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// SQLite database file, or `:memory:`.
    #[arg(long, env = "REGISTRY_DATABASE_PATH", default_value = "registry.db")]
    pub database_path: String,

    /// Maximum request body size in bytes.
    #[arg(long, env = "REGISTRY_MAX_BODY_SIZE", default_value = "1048576")]
    pub max_body_size: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "REGISTRY_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "REGISTRY_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "REGISTRY_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(
        long,
        env = "REGISTRY_CORS_METHODS",
        default_value = "GET,POST,PUT,DELETE,OPTIONS"
    )]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "REGISTRY_CORS_HEADERS",
        default_value = "Content-Type,Authorization,Accept"
    )]
    pub cors_headers: String,

    /// Largest accepted page size for listings.
    #[arg(long, env = "REGISTRY_MAX_PAGE_SIZE", default_value = "1000")]
    pub max_page_size: u32,

    /// Number of database checks at startup.
    #[arg(long, env = "REGISTRY_STARTUP_ATTEMPTS", default_value = "30")]
    pub startup_attempts: u32,

    /// Pause between database checks, in milliseconds.
    #[arg(long, env = "REGISTRY_STARTUP_DELAY_MS", default_value = "2000")]
    pub startup_delay_ms: u64,

    /// Insert the sample patients when the patients table is empty.
    #[arg(long, env = "REGISTRY_SEED_SAMPLE_PATIENTS", default_value = "true")]
    pub seed_sample_patients: bool,

    /// Identity gate settings.
    #[command(flatten)]
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            database_path: "registry.db".to_string(),
            max_body_size: 1024 * 1024,
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,PUT,DELETE,OPTIONS".to_string(),
            cors_headers: "Content-Type,Authorization,Accept".to_string(),
            max_page_size: 1000,
            startup_attempts: 30,
            startup_delay_ms: 2000,
            seed_sample_patients: true,
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the pause between startup checks.
    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.database_path.trim().is_empty() {
            errors.push("Database path cannot be empty".to_string());
        }

        if self.max_body_size == 0 {
            errors.push("Max body size cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.max_page_size == 0 {
            errors.push("Max page size cannot be 0".to_string());
        }

        if self.startup_attempts == 0 {
            errors.push("Startup attempts cannot be 0".to_string());
        }

        if self.auth.username.is_empty() || self.auth.password.is_empty() {
            errors.push("Operator username and password cannot be empty".to_string());
        }

        if self.auth.jwt_secret.is_empty() {
            errors.push("JWT secret cannot be empty".to_string());
        }

        if self.auth.token_ttl.is_zero() {
            errors.push("Token lifetime cannot be 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// Uses an in-memory database, no retries and no sample patients.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            host: "127.0.0.1".to_string(),
            log_level: "debug".to_string(),
            database_path: ":memory:".to_string(),
            max_body_size: 1024 * 1024,
            request_timeout: 5,
            enable_cors: false,
            cors_origins: "*".to_string(),
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            max_page_size: 100,
            startup_attempts: 1,
            startup_delay_ms: 0,
            seed_sample_patients: false,
            auth: AuthConfig {
                jwt_secret: "test-secret".to_string(),
                ..AuthConfig::default()
            },
        }
    }
}
