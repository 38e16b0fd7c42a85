//! Loader for labsite configuration with YAML + environment overlays.
//!
//! Sources are merged in order: YAML file(s), inline YAML, then
//! `LABSITE__`-prefixed environment variables (`__` separates nesting, so
//! `LABSITE__HTTP__TIMEOUT_SECS=5` sets `http.timeout_secs`). After merging,
//! `${VAR}` placeholders in string values are expanded. Every field has a
//! default, so an empty source set yields a usable configuration.
use config::{Config, ConfigError, Environment, File};
use labsite_common::observability::LogFormat;
use labsite_common::{DEFAULT_CO_AUTHOR, DEFAULT_ID_PREFIX};
pub use labsite_common::DEFAULT_USER_AGENT;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

pub const DEFAULT_CONFIG_FILE: &str = "labsite.yaml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LabsiteConfig {
    /// Achievements JSON read and rewritten by both pipelines.
    pub achievements_path: PathBuf,
    /// Directory of Markdown news posts scanned by the generator.
    pub news_dir: PathBuf,
    /// Label appended after every primary author.
    pub co_author: String,
    /// Prefix for renumbered record identifiers.
    pub id_prefix: String,
    pub http: HttpSettings,
    pub log: LogSettings,
}

impl Default for LabsiteConfig {
    fn default() -> Self {
        Self {
            achievements_path: PathBuf::from("src/content/achievements/temp.json"),
            news_dir: PathBuf::from("src/content/news"),
            co_author: DEFAULT_CO_AUTHOR.to_string(),
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            http: HttpSettings::default(),
            log: LogSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub format: LogFormat,
    pub emit_stderr: bool,
    pub filter: String,
    pub dir: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            emit_stderr: false,
            filter: "info".to_string(),
            dir: None,
        }
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

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct LabsiteConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: &'static str,
}

impl Default for LabsiteConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl LabsiteConfigLoader {
    /// Start with no file sources; environment overrides are applied last.
    ///
    /// ```
    /// use labsite_config::LabsiteConfigLoader;
    ///
    /// let config = LabsiteConfigLoader::new()
    ///     .with_yaml_str("co_author: Lab\nhttp:\n  timeout_secs: 3")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.co_author, "Lab");
    /// assert_eq!(config.http.timeout_secs, 3);
    /// assert_eq!(config.id_prefix, "achievement");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env_prefix: "LABSITE",
        }
    }

    /// Attach a file that must exist; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is silently skipped when absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet (tests and CLI overrides).
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// ```
    /// use labsite_config::LabsiteConfigLoader;
    ///
    /// unsafe { std::env::set_var("LAB_NEWS_ROOT", "/srv/site"); }
    ///
    /// let config = LabsiteConfigLoader::new()
    ///     .with_yaml_str("news_dir: \"${LAB_NEWS_ROOT}/news\"")
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.news_dir, std::path::PathBuf::from("/srv/site/news"));
    ///
    /// unsafe { std::env::remove_var("LAB_NEWS_ROOT"); }
    /// ```
    pub fn load(self) -> Result<LabsiteConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(self.env_prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
