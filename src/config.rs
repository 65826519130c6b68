use std::env;
use std::path::PathBuf;

pub const DEFAULT_ENDPOINT: &str = "https://oi-server.onrender.com/chat/completions";
pub const DEFAULT_MODEL: &str = "replicate/black-forest-labs/flux-1.1-pro";
pub const DEFAULT_HISTORY_PATH: &str = "image-history.json";
pub const HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HistoryConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub history: HistoryConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let host = env::var("HOST").unwrap_or(defaults.host);
        let port = env::var("PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(defaults.port);

        ServerConfig { host, port }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        UpstreamConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            customer_id: None,
        }
    }
}

impl UpstreamConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let endpoint =
            env::var("IMAGEGEN_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let model = env::var("IMAGEGEN_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let api_key = env::var("IMAGEGEN_API_KEY").ok();
        let customer_id = env::var("IMAGEGEN_CUSTOMER_ID").ok();

        UpstreamConfig {
            endpoint,
            model,
            api_key,
            customer_id,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_credentials(
        mut self,
        api_key: impl Into<String>,
        customer_id: impl Into<String>,
    ) -> Self {
        self.api_key = Some(api_key.into());
        self.customer_id = Some(customer_id.into());
        self
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            path: PathBuf::from(DEFAULT_HISTORY_PATH),
        }
    }
}

impl HistoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let path = env::var("IMAGEGEN_HISTORY")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_HISTORY_PATH));

        HistoryConfig { path }
    }

    /// The history never holds more than this many entries.
    pub fn capacity(&self) -> usize {
        HISTORY_CAPACITY
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Config {
            server: ServerConfig::from_env(),
            upstream: UpstreamConfig::from_env(),
            history: HistoryConfig::from_env(),
        }
    }

    pub fn with_server(mut self, config: ServerConfig) -> Self {
        self.server = config;
        self
    }

    pub fn with_upstream(mut self, config: UpstreamConfig) -> Self {
        self.upstream = config;
        self
    }

    pub fn with_history(mut self, config: HistoryConfig) -> Self {
        self.history = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.base_url(), "http://127.0.0.1:3000");
        assert_eq!(config.upstream.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.upstream.model, DEFAULT_MODEL);
        assert!(config.upstream.api_key.is_none());
        assert_eq!(config.history.capacity(), 50);
    }

    #[test]
    fn test_builders() {
        let config = Config::new()
            .with_server(ServerConfig::new().with_host("0.0.0.0").with_port(8080))
            .with_upstream(
                UpstreamConfig::new()
                    .with_endpoint("http://localhost:9000/chat/completions")
                    .with_credentials("key", "cus_1"),
            )
            .with_history(HistoryConfig::new().with_path("/tmp/h.json"));

        assert_eq!(config.server.base_url(), "http://0.0.0.0:8080");
        assert_eq!(
            config.upstream.endpoint,
            "http://localhost:9000/chat/completions"
        );
        assert_eq!(config.upstream.customer_id.as_deref(), Some("cus_1"));
        assert_eq!(config.history.path, PathBuf::from("/tmp/h.json"));
    }
}
