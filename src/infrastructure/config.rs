// Infrastructure: Layered application configuration
// defaults -> YAML file (optional) -> SYNAPTIC__* environment -> CLI overrides

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::domain::DEFAULT_PREVIEW_ROWS;
use crate::symbolic::SolverLimits;

/// Prefix for environment overrides, e.g. `SYNAPTIC__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "SYNAPTIC__";

/// Fallback source for the language-model API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file does not exist: {0}")]
    MissingFile(PathBuf),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Figment(#[from] Box<figment::Error>),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: HttpConfig,
    pub cors: CorsConfig,
    pub chat: ChatConfig,
    pub solver: SolverConfig,
    pub upload: UploadConfig,
    pub logging: LoggingConfig,
}

/// Listener and request handling, the `server` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    /// Directory served for every path without an API route
    pub static_dir: Option<PathBuf>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            request_timeout_secs: 30,
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub allow_credentials: bool,
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec!["*".to_string()],
            allowed_headers: vec!["*".to_string()],
            allow_credentials: false,
            max_age_seconds: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub request_timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            max_tokens: 3000,
            temperature: 0.18,
            request_timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub max_degree: usize,
    pub max_exponent: u32,
    pub max_depth: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let limits = SolverLimits::default();
        Self {
            max_degree: limits.max_degree,
            max_exponent: limits.max_exponent,
            max_depth: limits.max_depth,
        }
    }
}

impl SolverConfig {
    pub fn limits(&self) -> SolverLimits {
        SolverLimits {
            max_degree: self.max_degree,
            max_exponent: self.max_exponent,
            max_depth: self.max_depth,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_upload_size_mb: usize,
    pub preview_rows: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_upload_size_mb: 20,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl UploadConfig {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_size_mb.saturating_mul(1024 * 1024)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` wins when set
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load the layered configuration; `path` must exist when given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
            figment = figment.merge(Yaml::file(path));
        }

        let mut config: AppConfig = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)?;

        if config.chat.api_key.as_deref().map_or(true, str::is_empty) {
            config.chat.api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        }

        Ok(config)
    }

    pub fn apply_cli_overrides(&mut self, port: Option<u16>, verbose: u8) {
        if let Some(port) = port {
            self.server.port = port;
        }

        match verbose {
            0 => {}
            1 => self.logging.level = "info".to_string(),
            2 => self.logging.level = "debug".to_string(),
            _ => self.logging.level = "trace".to_string(),
        }
    }

    /// Checks that hold for every command; the API key is checked only when serving
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "server.request_timeout_secs must be positive".to_string(),
            ));
        }
        if self.upload.max_upload_size_mb == 0 {
            return Err(ConfigError::Invalid(
                "upload.max_upload_size_mb must be positive".to_string(),
            ));
        }
        if self.solver.max_degree == 0 {
            return Err(ConfigError::Invalid(
                "solver.max_degree must be positive".to_string(),
            ));
        }
        if self.solver.max_depth == 0 {
            return Err(ConfigError::Invalid(
                "solver.max_depth must be positive".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.chat.temperature) {
            return Err(ConfigError::Invalid(
                "chat.temperature must be between 0 and 2".to_string(),
            ));
        }
        self.bind_address()?;
        Ok(())
    }

    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("server address: {e}")))
    }

    /// The configured API key, which serving requires
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.chat.api_key.as_deref().ok_or_else(|| {
            ConfigError::Invalid(format!(
                "chat.api_key is not set; configure it or export {API_KEY_ENV}"
            ))
        })
    }

    /// Effective configuration with the API key masked
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.chat.api_key.is_some() {
            config.chat.api_key = Some("***".to_string());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.chat.model, "gpt-4o-mini");
        assert_eq!(config.chat.max_tokens, 3000);
        assert_eq!(config.upload.preview_rows, 5);
        assert_eq!(config.upload.max_upload_bytes(), 20 * 1024 * 1024);
        assert_eq!(config.solver.limits(), SolverLimits::default());
        assert_eq!(config.solver.max_depth, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/definitely/not/here.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile(_)));
    }

    #[test]
    fn test_yaml_then_env_layering() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "server:\n  port: 9100\nchat:\n  api_key: from-file\nupload:\n  preview_rows: 3"
        )
        .unwrap();

        temp_env::with_vars(
            [
                ("SYNAPTIC__SERVER__PORT", Some("9200")),
                ("SYNAPTIC__SOLVER__MAX_DEGREE", Some("12")),
            ],
            || {
                let config = AppConfig::load(Some(file.path())).unwrap();
                assert_eq!(config.server.port, 9200);
                assert_eq!(config.solver.max_degree, 12);
                assert_eq!(config.upload.preview_rows, 3);
                assert_eq!(config.chat.api_key.as_deref(), Some("from-file"));
            },
        );
    }

    #[test]
    fn test_api_key_falls_back_to_openai_env() {
        temp_env::with_vars(
            [
                (API_KEY_ENV, Some("sk-env")),
                ("SYNAPTIC__CHAT__API_KEY", None),
            ],
            || {
                let config = AppConfig::load(None).unwrap();
                assert_eq!(config.require_api_key().unwrap(), "sk-env");
                assert_eq!(config.redacted().chat.api_key.as_deref(), Some("***"));
            },
        );
    }

    #[test]
    fn test_example_config_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/synaptic.yaml");
        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.chat.max_tokens, 3000);
        assert_eq!(config.upload.preview_rows, 5);
        assert!(config.server.static_dir.is_none());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = AppConfig::default();
        config.apply_cli_overrides(Some(1234), 2);
        assert_eq!(config.server.port, 1234);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_server_section_maps_to_http_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server:\n  request_timeout_secs: 5\n  static_dir: ./public").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        let http: &HttpConfig = &config.server;
        assert_eq!(http.request_timeout_secs, 5);
        assert_eq!(http.static_dir.as_deref(), Some(Path::new("./public")));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.server.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.server.host = "not a host".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.solver.max_depth = 0;
        assert!(config.validate().is_err());
    }
}
