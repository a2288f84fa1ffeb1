use pagecraft_core::generation::DEFAULT_BATCH_SIZE;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Origin used to build recipients' personalized URLs.
    pub public_base_url: String,
    /// Contacts written per insert during bulk generation.
    pub generation_batch_size: usize,
    /// Timeout for fetching a Google Sheet's CSV export.
    pub sheet_fetch_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`    | `30`                       |
    /// | `PUBLIC_BASE_URL`          | `http://localhost:3000`    |
    /// | `GENERATION_BATCH_SIZE`    | `50`                       |
    /// | `SHEET_FETCH_TIMEOUT_SECS` | `15`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        let generation_batch_size: usize = std::env::var("GENERATION_BATCH_SIZE")
            .unwrap_or_else(|_| DEFAULT_BATCH_SIZE.to_string())
            .parse()
            .expect("GENERATION_BATCH_SIZE must be a valid usize");
        assert!(generation_batch_size > 0, "GENERATION_BATCH_SIZE must be positive");

        let sheet_fetch_timeout_secs: u64 = std::env::var("SHEET_FETCH_TIMEOUT_SECS")
            .unwrap_or_else(|_| "15".into())
            .parse()
            .expect("SHEET_FETCH_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            public_base_url,
            generation_batch_size,
            sheet_fetch_timeout_secs,
        }
    }
}
