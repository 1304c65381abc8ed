use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "masar.toml";
const RC_FILE: &str = ".masar-rc";

/// Main configuration structure for masar
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MasarConfig {
    /// Backend connection settings
    pub backend: BackendConfig,
    /// Logging and metrics settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Root URL of the backend, or of the web proxy in front of it
    pub base_url: String,
    /// Python module prefix of the submittal RPC methods
    pub api_module: String,
    /// Path of the login endpoint relative to `base_url`
    pub login_path: String,
    /// DocType of submittal records
    pub doctype: String,
    /// Login user (can be set via MASAR_USERNAME)
    pub username: Option<String>,
    /// Login password (can be set via MASAR_PASSWORD)
    pub password: Option<String>,
    /// Per-request timeout
    pub timeout_seconds: u64,
    /// How long the workflow state list stays cached
    pub state_cache_ttl_seconds: u64,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Sustained requests per second
    pub requests_per_second: u32,
    /// Burst capacity
    pub burst_capacity: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Default log level when RUST_LOG is unset
    pub log_level: String,
    /// "pretty" for terminals, "json" for structured output
    pub log_format: String,
    /// Log API counters when a command finishes
    pub metrics_enabled: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            api_module: "masar_dms.api".to_string(),
            login_path: "api/method/login".to_string(),
            doctype: "Masar Document".to_string(),
            username: None,
            password: None,
            timeout_seconds: 30,
            state_cache_ttl_seconds: 300,
            rate_limit: RateLimitConfig {
                requests_per_second: 10,
                burst_capacity: 20,
            },
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
        }
    }
}

impl Default for MasarConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl BackendConfig {
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(password)) if !user.is_empty() => Some((user, password)),
            _ => None,
        }
    }
}

impl MasarConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (masar.toml, .masar-rc, or an explicit path)
    /// 3. Environment variables (prefixed with MASAR_, nested with `__`)
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&MasarConfig::default())?);

        match explicit {
            Some(path) => {
                builder = builder.add_source(File::from(path.to_path_buf()).required(true));
            }
            None => {
                if Path::new(DEFAULT_CONFIG_FILE).exists() {
                    builder = builder.add_source(File::with_name(DEFAULT_CONFIG_FILE));
                }
                if Path::new(RC_FILE).exists() {
                    builder = builder.add_source(
                        File::new(RC_FILE, config::FileFormat::Toml).required(false),
                    );
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("MASAR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut masar_config: MasarConfig = builder.build()?.try_deserialize()?;

        // Flat credential variables are easier to export than nested keys
        if let Ok(user) = std::env::var("MASAR_USERNAME") {
            masar_config.backend.username = Some(user);
        }
        if let Ok(password) = std::env::var("MASAR_PASSWORD") {
            masar_config.backend.password = Some(password);
        }

        Ok(masar_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn explicit_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[backend]
base_url = "https://dms.example.com/api/proxy"
login_path = "login"
timeout_seconds = 5
"#
        )
        .unwrap();

        let config = MasarConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.backend.base_url, "https://dms.example.com/api/proxy");
        assert_eq!(config.backend.login_path, "login");
        assert_eq!(config.backend.timeout_seconds, 5);
        assert_eq!(config.backend.doctype, "Masar Document");
        assert_eq!(config.observability.log_format, "pretty");
    }

    #[test]
    fn saved_config_round_trips_through_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("masar.toml");
        let mut original = MasarConfig::default();
        original.backend.api_module = "custom.api".to_string();
        original.save_to_file(&path).unwrap();

        let loaded = MasarConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded.backend.api_module, "custom.api");
    }

    #[test]
    fn credentials_require_both_parts() {
        let mut backend = BackendConfig::default();
        assert!(backend.credentials().is_none());
        backend.username = Some("eng@contractor.example".to_string());
        assert!(backend.credentials().is_none());
        backend.password = Some("secret".to_string());
        assert_eq!(backend.credentials(), Some(("eng@contractor.example", "secret")));
    }
}
