//! Server configuration with TOML file and environment support.

use eden_delegates::{CacheConfig, ChainConfig};
use eden_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::RpcError;

/// Configuration for the delegates API server.
///
/// Sources are layered: defaults, then an optional TOML file, then
/// environment variables (`APP_ENV`, `APP_NAME`, `SERVER_HOST`,
/// `SERVER_PORT`, `EDEN_SNAPSHOT`). The daemon applies CLI flags last.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Deployment environment, e.g. "development" or "production".
    #[serde(default = "default_env")]
    pub env: String,

    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Always the version of the running build.
    #[serde(skip_deserializing, default = "default_app_version")]
    pub app_version: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// JSON snapshot backing the member directory.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub chain: ChainConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_env() -> String {
    "development".to_string()
}

fn default_app_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    3032
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, RpcError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| RpcError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, RpcError> {
        toml::from_str(s).map_err(|e| RpcError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, RpcError> {
        toml::to_string_pretty(self).map_err(|e| RpcError::Config(e.to_string()))
    }

    /// Defaults or the given file, with process environment applied on top.
    pub fn load(path: Option<&Path>) -> Result<Self, RpcError> {
        let mut config = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        config.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Override fields from environment variables read through `lookup`.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), RpcError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(env) = lookup("APP_ENV") {
            self.env = env;
        }
        if let Some(name) = lookup("APP_NAME") {
            self.app_name = name;
        }
        if let Some(host) = lookup("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.port = port
                .parse()
                .map_err(|_| RpcError::Config(format!("SERVER_PORT is not a port: {port:?}")))?;
        }
        if let Some(path) = lookup("EDEN_SNAPSHOT") {
            self.snapshot_path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// `host:port` for binding the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.env == "production"
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            env: default_env(),
            app_name: default_app_name(),
            app_version: default_app_version(),
            host: default_host(),
            port: default_port(),
            snapshot_path: None,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            chain: ChainConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_server_conventions() {
        let config = ServerConfig::default();
        assert_eq!(config.env, "development");
        assert_eq!(config.app_name, "eden-rpc");
        assert_eq!(config.app_version, env!("CARGO_PKG_VERSION"));
        assert_eq!(config.bind_addr(), "localhost:3032");
        assert_eq!(config.chain.max_hops, 32);
        assert!(!config.is_production());
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = ServerConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            port = 8080
            log_format = "json"
            snapshot_path = "/var/lib/eden/members.json"

            [chain]
            max_hops = 8

            [cache]
            stale_time_secs = 5
        "#;
        let config = ServerConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(
            config.snapshot_path.as_deref(),
            Some(Path::new("/var/lib/eden/members.json"))
        );
        assert_eq!(config.chain.max_hops, 8);
        assert_eq!(config.cache.stale_time_secs, 5);
        assert_eq!(config.cache.max_entries, CacheConfig::default().max_entries);
        assert_eq!(config.host, "localhost");
    }

    #[test]
    fn version_cannot_be_overridden_from_file() {
        let config = ServerConfig::from_toml_str(r#"app_version = "9.9.9""#).unwrap();
        assert_eq!(config.app_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = ServerConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = ServerConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut config = ServerConfig::from_toml_str("port = 8080").unwrap();
        config
            .apply_env_with(env_of(&[
                ("APP_ENV", "production"),
                ("APP_NAME", "eden-box"),
                ("SERVER_HOST", "0.0.0.0"),
                ("SERVER_PORT", "9000"),
                ("EDEN_SNAPSHOT", "snap.json"),
            ]))
            .unwrap();
        assert!(config.is_production());
        assert_eq!(config.app_name, "eden-box");
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.snapshot_path, Some(PathBuf::from("snap.json")));
    }

    #[test]
    fn invalid_port_in_environment_is_rejected() {
        let mut config = ServerConfig::default();
        let err = config
            .apply_env_with(env_of(&[("SERVER_PORT", "not-a-port")]))
            .unwrap_err();
        assert!(matches!(err, RpcError::Config(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "host = \"127.0.0.1\"").unwrap();
        let config = ServerConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = ServerConfig::from_toml_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, RpcError::Config(_)));
    }
}
