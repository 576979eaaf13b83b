use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub mirrors: MirrorSourceConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Where the mirror list comes from at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MirrorSourceConfig {
    /// URL returning the capability -> mirrors map.
    pub source_url: String,
    #[serde(default = "default_source_connect_timeout")]
    pub source_connect_timeout_ms: u64,
    #[serde(default = "default_source_read_timeout")]
    pub source_read_timeout_ms: u64,
}

impl MirrorSourceConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.source_connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.source_read_timeout_ms)
    }
}

fn default_source_connect_timeout() -> u64 {
    1000
}

fn default_source_read_timeout() -> u64 {
    500
}

/// Failover fetcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Path segment inserted between the mirror base URL and the request path.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Total wall-clock budget for one fetch across all mirrors (milliseconds).
    #[serde(default = "default_max_total")]
    pub max_total_ms: u64,
    /// No new attempt is started once less than this remains in the budget.
    #[serde(default = "default_safety_margin")]
    pub safety_margin_ms: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_read_timeout")]
    pub read_timeout_ms: u64,
    /// Probe the first media stream of video payloads before accepting them.
    #[serde(default)]
    pub strict_media_check: bool,
    #[serde(default = "default_media_connect_timeout")]
    pub media_connect_timeout_ms: u64,
    #[serde(default = "default_media_read_timeout")]
    pub media_read_timeout_ms: u64,
}

impl FetchConfig {
    pub fn max_total(&self) -> Duration {
        Duration::from_millis(self.max_total_ms)
    }

    pub fn safety_margin(&self) -> Duration {
        Duration::from_millis(self.safety_margin_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn media_connect_timeout(&self) -> Duration {
        Duration::from_millis(self.media_connect_timeout_ms)
    }

    pub fn media_read_timeout(&self) -> Duration {
        Duration::from_millis(self.media_read_timeout_ms)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            api_prefix: default_api_prefix(),
            max_total_ms: default_max_total(),
            safety_margin_ms: default_safety_margin(),
            connect_timeout_ms: default_connect_timeout(),
            read_timeout_ms: default_read_timeout(),
            strict_media_check: false,
            media_connect_timeout_ms: default_media_connect_timeout(),
            media_read_timeout_ms: default_media_read_timeout(),
        }
    }
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

fn default_max_total() -> u64 {
    10_000
}

fn default_safety_margin() -> u64 {
    1_000
}

fn default_connect_timeout() -> u64 {
    1_500
}

fn default_read_timeout() -> u64 {
    1_000
}

fn default_media_connect_timeout() -> u64 {
    3_000
}

fn default_media_read_timeout() -> u64 {
    500
}

/// Outbound client identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityConfig {
    #[serde(default = "default_user_agents")]
    pub user_agents: Vec<String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            user_agents: default_user_agents(),
        }
    }
}

fn default_user_agents() -> Vec<String> {
    [
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.6 Safari/605.1.15",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:129.0) Gecko/20100101 Firefox/129.0",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36",
    ]
    .iter()
    .map(|ua| ua.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_config() {
        let toml = r#"
[mirrors]
source_url = "https://example.com/mirrors.txt"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.mirrors.source_url, "https://example.com/mirrors.txt");
        assert_eq!(config.mirrors.source_connect_timeout_ms, 1000);
        assert_eq!(config.mirrors.source_read_timeout_ms, 500);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
    }

    #[test]
    fn test_fetch_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.api_prefix, "/api/v1");
        assert_eq!(config.max_total(), Duration::from_secs(10));
        assert_eq!(config.safety_margin(), Duration::from_secs(1));
        assert_eq!(config.connect_timeout(), Duration::from_millis(1500));
        assert_eq!(config.read_timeout(), Duration::from_millis(1000));
        assert!(!config.strict_media_check);
        assert_eq!(config.media_connect_timeout(), Duration::from_secs(3));
        assert_eq!(config.media_read_timeout(), Duration::from_millis(500));
    }

    #[test]
    fn test_deserialize_missing_mirrors_fails() {
        let toml = r#"
[server]
port = 8080
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[mirrors]
source_url = "http://localhost/list"
source_connect_timeout_ms = 2000

[fetch]
max_total_ms = 5000
strict_media_check = true

[identity]
user_agents = ["agent-a", "agent-b"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.mirrors.connect_timeout(), Duration::from_secs(2));
        assert_eq!(config.fetch.max_total_ms, 5000);
        assert_eq!(config.fetch.safety_margin_ms, 1000);
        assert!(config.fetch.strict_media_check);
        assert_eq!(config.identity.user_agents, vec!["agent-a", "agent-b"]);
    }

    #[test]
    fn test_default_identity_has_agents() {
        let identity = IdentityConfig::default();
        assert!(!identity.user_agents.is_empty());
        assert!(identity
            .user_agents
            .iter()
            .all(|ua| ua.starts_with("Mozilla/5.0")));
    }
}
