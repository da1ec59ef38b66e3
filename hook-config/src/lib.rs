//! Loader for the workflow configuration with YAML + environment overlays.
//!
//! Precedence, lowest first: built-in defaults, an optional YAML file, then
//! `HOOK__`-prefixed environment variables (`HOOK__IDENTITY__REG_NO=...`).
//! After merging, `${VAR}` placeholders inside string values are expanded.
//! With no file and no environment the loaded config reproduces the fixed
//! registration identity, endpoint and retry policy of the workflow.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

pub const DEFAULT_INIT_URL: &str = "https://bfhldevapigw.healthrx.co.in/hiring/generateWebhook";
pub const DEFAULT_NAME: &str = "John Doe";
pub const DEFAULT_REG_NO: &str = "REG12347";
pub const DEFAULT_EMAIL: &str = "john@example.com";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookConfig {
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub submission: SubmissionConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Who is registering for the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdentityConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_reg_no")]
    pub reg_no: String,
    #[serde(default = "default_email")]
    pub email: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            reg_no: default_reg_no(),
            email: default_email(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_init_url")]
    pub init_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            init_url: default_init_url(),
        }
    }
}

/// Attempt budget and pause used when posting the result.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl SubmissionConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout; unset keeps the HTTP client's default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn default_init_url() -> String {
    DEFAULT_INIT_URL.into()
}
fn default_name() -> String {
    DEFAULT_NAME.into()
}
fn default_reg_no() -> String {
    DEFAULT_REG_NO.into()
}
fn default_email() -> String {
    DEFAULT_EMAIL.into()
}
fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}
fn default_retry_delay_ms() -> u64 {
    DEFAULT_RETRY_DELAY_MS
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

fn validate(cfg: &HookConfig) -> Result<(), ConfigError> {
    if cfg.submission.max_attempts == 0 {
        return Err(ConfigError::Message(
            "submission.max_attempts must be at least 1".into(),
        ));
    }
    if cfg.identity.reg_no.trim().is_empty() {
        return Err(ConfigError::Message("identity.reg_no must not be empty".into()));
    }
    url::Url::parse(&cfg.endpoint.init_url)
        .map_err(|e| ConfigError::Message(format!("endpoint.init_url: {e}")))?;
    Ok(())
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct HookConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for HookConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl HookConfigLoader {
    /// Start from the built-in defaults with `HOOK__` env overrides.
    ///
    /// ```
    /// use hook_config::{HookConfigLoader, DEFAULT_REG_NO};
    ///
    /// let config = HookConfigLoader::new().load().expect("defaults are valid");
    /// assert_eq!(config.identity.reg_no, DEFAULT_REG_NO);
    /// assert_eq!(config.submission.max_attempts, 4);
    /// assert!(config.http.timeout().is_none());
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

    /// Attach a file that is merged only when present.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use hook_config::HookConfigLoader;
    ///
    /// let cfg = HookConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// identity:
    ///   name: "Jane Roe"
    /// submission:
    ///   retry_delay_ms: 5
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.identity.name, "Jane Roe");
    /// assert_eq!(cfg.identity.email, "john@example.com");
    /// assert_eq!(cfg.submission.retry_delay().as_millis(), 5);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder, expand `${VAR}` placeholders and deserialize.
    ///
    /// The environment source is attached last so it overrides every file.
    pub fn load(self) -> Result<HookConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(Environment::with_prefix("HOOK").separator("__"))
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        // Round-trip through `Config` so env strings like "2" still land in numeric fields.
        let typed: HookConfig = Config::try_from(&v)?.try_deserialize()?;
        validate(&typed)?;
        Ok(typed)
    }
}
