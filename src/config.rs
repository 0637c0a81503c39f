use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Endpoint serving the sales dataset when `VENDAS_SOURCE_URL` is unset.
pub const DEFAULT_SOURCE_URL: &str = "https://labdados.com/produtos";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub source_url: String,
    pub static_path: PathBuf,
    /// Upper bound for one upstream fetch. `None` waits until the source
    /// answers or the connection fails.
    pub request_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: env::var("VENDAS_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("VENDAS_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8501),
            source_url: env::var("VENDAS_SOURCE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SOURCE_URL.into()),
            static_path: env::var("VENDAS_STATIC_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("static")),
            request_timeout: env::var("VENDAS_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
