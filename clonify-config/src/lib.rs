//! Loader for Clonify configuration with YAML + environment overlays.
//!
//! Sources, later ones winning:
//!
//! 1. built-in defaults (every field has one, so an empty file is valid)
//! 2. a YAML file (`--config`, `./clonify.yaml` or `~/.config/clonify/clonify.yaml`)
//! 3. `CLONIFY__<SECTION>__<KEY>` environment variables
//!
//! String values may reference `${VAR}`; references are expanded after merging.
use clonify_common::observability::LogFormat;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const CONFIG_FILE_NAME: &str = "clonify.yaml";

pub const DEFAULT_PROXY_ENDPOINT: &str = "https://api.allorigins.win/get";
pub const DEFAULT_CONTENT_FIELD: &str = "contents";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClonifyConfig {
    pub proxy: ProxyConfig,
    pub download: DownloadConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

/// Where pages are fetched from and how the response is read.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub endpoint: String,
    /// JSON field of the proxy response that carries the page markup.
    pub content_field: String,
    pub timeout_secs: u64,
    pub retries: usize,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_PROXY_ENDPOINT.into(),
            content_field: DEFAULT_CONTENT_FIELD.into(),
            timeout_secs: 30,
            retries: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    pub dir: PathBuf,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Redraw/animation interval.
    pub tick_ms: u64,
    /// Number of ticks the typing reveal takes to show a whole panel.
    pub reveal_ticks: usize,
    pub max_particles: usize,
    pub shapes: usize,
    /// Fixed seed for the background; random when unset.
    pub seed: Option<u64>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: 40,
            reveal_ticks: 30,
            max_particles: 150,
            shapes: 8,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Used when `RUST_LOG` is unset.
    pub filter: String,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            filter: "info".into(),
            dir: None,
        }
    }
}

impl ClonifyConfig {
    /// Reject values that would only fail later at request or draw time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.proxy.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::Message(format!(
                "proxy.endpoint must be an http(s) URL, got {endpoint:?}"
            )));
        }
        if self.proxy.content_field.trim().is_empty() {
            return Err(ConfigError::Message(
                "proxy.content_field must not be empty".into(),
            ));
        }
        if self.ui.tick_ms == 0 {
            return Err(ConfigError::Message("ui.tick_ms must be positive".into()));
        }
        Ok(())
    }
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

/// User-level config location, e.g. `~/.config/clonify/clonify.yaml`.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("clonify").join(CONFIG_FILE_NAME))
}

fn discover_config_file(
    explicit: Option<&Path>,
    local: &Path,
    user: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if local.is_file() {
        return Some(local.to_path_buf());
    }
    user.filter(|p| p.is_file())
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct ClonifyConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for ClonifyConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ClonifyConfigLoader {
    /// Start with defaults only; file sources are added by the `with_*` methods.
    ///
    /// ```
    /// use clonify_config::{ClonifyConfigLoader, DEFAULT_PROXY_ENDPOINT};
    ///
    /// let config = ClonifyConfigLoader::new().load().expect("defaults load");
    /// assert_eq!(config.proxy.endpoint, DEFAULT_PROXY_ENDPOINT);
    /// assert_eq!(config.proxy.content_field, "contents");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist; format is inferred by suffix.
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

    /// Use `explicit` if given (it must exist); otherwise the first of
    /// `./clonify.yaml` and the user config file that exists.
    pub fn with_discovered_files(self, explicit: Option<&Path>) -> Self {
        match discover_config_file(explicit, Path::new(CONFIG_FILE_NAME), user_config_path()) {
            Some(path) => self.with_file(path),
            None => self,
        }
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use clonify_config::ClonifyConfigLoader;
    ///
    /// let cfg = ClonifyConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// proxy:
    ///   endpoint: "https://proxy.example/get"
    ///   content_field: "body"
    /// ui:
    ///   seed: 7
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.proxy.content_field, "body");
    /// assert_eq!(cfg.proxy.timeout_secs, 30);
    /// assert_eq!(cfg.ui.seed, Some(7));
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Merge the sources, apply `CLONIFY__` env overrides, expand `${VAR}`
    /// placeholders and validate the typed result.
    pub fn load(self) -> Result<ClonifyConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("CLONIFY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: ClonifyConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        typed.validate()?;
        Ok(typed)
    }
}
