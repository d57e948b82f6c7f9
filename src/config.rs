use config::{Config, File};
pub use config::ConfigError;
use serde::Deserialize;

use crate::client::HistoryQuery;
use crate::consts::{DEFAULT_PAGE_LIMIT, OKX_API_URL};
use crate::signature::Credentials;

/// Main configuration struct, loaded once at startup
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Exchange endpoint and credentials
    pub okx: OkxConfig,
    /// Which page of history to request
    #[serde(default)]
    pub query: QueryConfig,
    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Clone, Deserialize)]
pub struct OkxConfig {
    /// REST base URL (default https://www.okx.com)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub api_key: String,
    /// In production, load this from ENV variables only
    pub secret_key: String,
    pub passphrase: String,
    /// Send `x-simulated-trading: 1` for demo accounts
    #[serde(default)]
    pub simulated: bool,
    /// Request deadline in seconds, transport default when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl OkxConfig {
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: credentials.api_key,
            secret_key: credentials.secret_key,
            passphrase: credentials.passphrase,
            simulated: false,
            timeout_secs: None,
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.api_key, &self.secret_key, &self.passphrase)
    }
}

impl std::fmt::Debug for OkxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OkxConfig")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials())
            .field("simulated", &self.simulated)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryConfig {
    /// Records per page (exchange caps this at 100)
    #[serde(default = "default_limit")]
    pub limit: Option<u32>,
    /// e.g. "SWAP", "FUTURES", "MARGIN"
    #[serde(default)]
    pub inst_type: Option<String>,
    /// e.g. "BTC-USDT-SWAP"
    #[serde(default)]
    pub inst_id: Option<String>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            inst_type: None,
            inst_id: None,
        }
    }
}

impl QueryConfig {
    pub fn to_query(&self) -> HistoryQuery {
        HistoryQuery {
            inst_type: self.inst_type.clone(),
            inst_id: self.inst_id.clone(),
            limit: self.limit,
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LogConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Serve the dashboard JSON API instead of printing once
    #[serde(default = "default_server_enabled")]
    pub enabled: bool,
    /// Server port (default 3000)
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Server host (default 127.0.0.1)
    #[serde(default = "default_server_host")]
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: default_server_enabled(),
            port: default_server_port(),
            host: default_server_host(),
        }
    }
}

fn default_base_url() -> String {
    OKX_API_URL.to_string()
}

fn default_limit() -> Option<u32> {
    Some(DEFAULT_PAGE_LIMIT)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_server_enabled() -> bool {
    false
}

fn default_server_port() -> u16 {
    3000
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

impl Settings {
    /// Load settings from a configuration file
    pub fn new(config_path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(config_path))
            // Environment overrides the file, e.g. APP_OKX__SECRET_KEY=...
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = from_toml(
            r#"
            [okx]
            api_key = "k"
            secret_key = "s"
            passphrase = "p"
            "#,
        );

        assert_eq!(settings.okx.base_url, "https://www.okx.com");
        assert!(!settings.okx.simulated);
        assert_eq!(settings.okx.timeout_secs, None);
        assert_eq!(settings.query.limit, Some(15));
        assert_eq!(settings.log.level, "info");
        assert!(!settings.server.enabled);
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.server.host, "127.0.0.1");
    }

    #[test]
    fn test_full_config() {
        let settings = from_toml(
            r#"
            [okx]
            base_url = "https://aws.okx.com"
            api_key = "k"
            secret_key = "s"
            passphrase = "p"
            simulated = true
            timeout_secs = 10

            [query]
            limit = 100
            inst_type = "SWAP"

            [server]
            enabled = true
            port = 8080
            "#,
        );

        assert_eq!(settings.okx.base_url, crate::consts::AWS_API_URL);
        assert!(settings.okx.simulated);
        assert_eq!(settings.okx.timeout_secs, Some(10));
        assert_eq!(settings.okx.credentials(), Credentials::new("k", "s", "p"));

        let query = settings.query.to_query();
        assert_eq!(query.limit, Some(100));
        assert_eq!(query.inst_type.as_deref(), Some("SWAP"));
        assert_eq!(query.after, None);

        assert!(settings.server.enabled);
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let result = Config::builder()
            .add_source(File::from_str("[okx]\napi_key = \"k\"", FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize::<Settings>();
        assert!(result.is_err());
    }

    #[test]
    fn test_environment_overrides_file() {
        let path = std::env::temp_dir().join(format!("okx_positions_env_{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[okx]\napi_key = \"k\"\nsecret_key = \"s\"\npassphrase = \"from-file\"\n",
        )
        .unwrap();

        std::env::set_var("APP_OKX__PASSPHRASE", "from-env");
        let settings = Settings::new(path.to_str().unwrap());
        std::env::remove_var("APP_OKX__PASSPHRASE");
        std::fs::remove_file(&path).ok();

        let settings = settings.unwrap();
        assert_eq!(settings.okx.passphrase, "from-env");
        assert_eq!(settings.okx.secret_key, "s");
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = OkxConfig::new(OKX_API_URL, Credentials::new("k", "top-secret", "p"));
        assert!(!format!("{:?}", config).contains("top-secret"));
    }
}
