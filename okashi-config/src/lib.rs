//! Loader for okashi configuration with YAML + environment overlays.
//!
//! Sources are layered in the order they are added; environment variables
//! prefixed with `OKASHI__` always win (`OKASHI__API__APIKEY=...` overrides
//! `api.apikey`). String values may reference other environment variables via
//! `${VAR}`, expanded recursively before the typed structs are built.
//!
//! Every field has a default, so an empty configuration is valid and targets
//! the public Toriko API with the guest key.
use config::{Config, ConfigError, Environment, File};
use okashi_api::QueryTemplate;
use okashi_api::query::{DEFAULT_API_KEY, DEFAULT_ENDPOINT, DEFAULT_ORDER, DEFAULT_PAGE_SIZE};
use okashi_common::observability::LogFormat;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use url::Url;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

pub const CONFIG_FILE_NAME: &str = "okashi.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OkashiConfig {
    pub version: Option<String>,
    pub api: ApiConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

/// Connection settings for the snack search API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub endpoint: Url,
    pub apikey: String,
    /// Page size sent as `max`.
    pub max: u32,
    /// Ranking order sent as `order` (`r` = relevance as ranked by the API).
    pub order: String,
    /// Whole-request timeout. `None` leaves the transport defaults alone.
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            apikey: DEFAULT_API_KEY.into(),
            max: DEFAULT_PAGE_SIZE,
            order: DEFAULT_ORDER.into(),
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// Request template built from these settings.
    pub fn template(&self) -> QueryTemplate {
        QueryTemplate::new(
            self.endpoint.clone(),
            self.apikey.clone(),
            self.max,
            self.order.clone(),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Mailbox capacity of the result store actor.
    pub mailbox: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { mailbox: 64 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: Option<PathBuf>,
    pub format: LogFormat,
    pub filter: String,
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            format: LogFormat::Text,
            filter: "info".into(),
            stderr: false,
        }
    }
}

fn default_endpoint() -> Url {
    // Constant input; parse cannot fail.
    Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL")
}

/// Candidate locations probed when no explicit `--config` is given.
pub fn default_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("okashi").join(CONFIG_FILE_NAME));
    }
    paths
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct OkashiConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for OkashiConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl OkashiConfigLoader {
    /// Start with `OKASHI__` env overrides only.
    ///
    /// ```
    /// use okashi_config::OkashiConfigLoader;
    ///
    /// let config = OkashiConfigLoader::new()
    ///     .with_yaml_str("version: '1'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.api.apikey, "guest");
    /// assert_eq!(config.api.max, 10);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a required YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is silently skipped when missing.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Attach every path from [`default_search_paths`] as optional sources.
    /// A file in the working directory overrides the per-user one.
    pub fn with_default_files(self) -> Self {
        default_search_paths()
            .into_iter()
            .rev()
            .fold(self, |loader, path| loader.with_optional_file(path))
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use okashi_config::OkashiConfigLoader;
    ///
    /// let cfg = OkashiConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// api:
    ///   endpoint: "http://127.0.0.1:8080/toriko/api/"
    ///   max: 5
    /// logging:
    ///   format: json
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.api.endpoint.as_str(), "http://127.0.0.1:8080/toriko/api/");
    /// assert_eq!(cfg.api.max, 5);
    /// assert_eq!(cfg.api.order, "r");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// ```
    /// use okashi_config::OkashiConfigLoader;
    ///
    /// unsafe { std::env::set_var("OKASHI_DOC_KEY", "injected-from-env"); }
    ///
    /// let config = OkashiConfigLoader::new()
    ///     .with_yaml_str("api:\n  apikey: \"${OKASHI_DOC_KEY}\"")
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.api.apikey, "injected-from-env");
    ///
    /// unsafe { std::env::remove_var("OKASHI_DOC_KEY"); }
    /// ```
    pub fn load(self) -> Result<OkashiConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(Environment::with_prefix("OKASHI").separator("__"))
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        // Round-trip through `config` so env strings like "5" still land in numeric fields.
        Config::try_from(&v)?.try_deserialize()
    }
}
