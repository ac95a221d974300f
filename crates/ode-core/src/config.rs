use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{OdeError, OdeResult};

pub const ENV_APPLICATION_ID: &str = "PIPELINE_APPLICATION_ID";
pub const ENV_DEPLOY_PATH: &str = "PIPELINE_DEPLOY_VCS_PATH";
pub const ENV_EVENT: &str = "PIPELINES_EVENT";
pub const ENV_KEY: &str = "N3_KEY";
pub const ENV_SECRET: &str = "N3_SECRET";
pub const ENV_DEBUG: &str = "ENVIRONMENTS_DEBUG";
pub const ENV_API_URL: &str = "CLOUD_API_URL";

pub const DEFAULT_API_URL: &str = "https://cloud.acquia.com/api/";
pub const DEFAULT_BRANCH: &str = "master";

/// Pipeline event that triggered this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    Build,
    Merge,
    /// Anything else; dispatching it is a no-op
    Other(String),
}

impl PipelineEvent {
    /// Parse an event name. Unset or empty means `build`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some("build") => PipelineEvent::Build,
            Some("merge") => PipelineEvent::Merge,
            Some(other) => PipelineEvent::Other(other.to_string()),
        }
    }
}

impl Default for PipelineEvent {
    fn default() -> Self {
        PipelineEvent::Build
    }
}

impl fmt::Display for PipelineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineEvent::Build => write!(f, "build"),
            PipelineEvent::Merge => write!(f, "merge"),
            PipelineEvent::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Read-only description of the pipeline run, captured once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    pub application_id: String,
    pub deploy_path: String,
    pub event: PipelineEvent,
}

impl BuildContext {
    pub fn new(
        application_id: impl Into<String>,
        deploy_path: impl Into<String>,
        event: PipelineEvent,
    ) -> Self {
        Self {
            application_id: application_id.into(),
            deploy_path: deploy_path.into(),
            event,
        }
    }

    /// Capture the build context from the process environment
    pub fn from_env() -> OdeResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Capture the build context through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> OdeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let application_id = required(&lookup, ENV_APPLICATION_ID)?;
        let deploy_path = required(&lookup, ENV_DEPLOY_PATH)?;
        let event = PipelineEvent::parse(lookup(ENV_EVENT).as_deref());

        debug!(
            "Build context: app={}, path={}, event={}",
            application_id, deploy_path, event
        );

        Ok(Self {
            application_id,
            deploy_path,
            event,
        })
    }
}

fn required<F>(lookup: &F, name: &str) -> OdeResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| OdeError::config(format!("{} environment variable is required", name)))
}

/// API key and secret
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
}

impl Credentials {
    pub fn from_env() -> OdeResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Both values must be present and non-empty
    pub fn from_lookup<F>(lookup: F) -> OdeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = lookup(ENV_KEY).filter(|v| !v.is_empty());
        let secret = lookup(ENV_SECRET).filter(|v| !v.is_empty());
        match (key, secret) {
            (Some(key), Some(secret)) => Ok(Self { key, secret }),
            _ => Err(OdeError::MissingCredentials),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Whether `ENVIRONMENTS_DEBUG` asks for debug output
pub fn debug_enabled() -> bool {
    flag_enabled(std::env::var(ENV_DEBUG).ok().as_deref())
}

fn flag_enabled(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None | Some("") | Some("0") => false,
        Some(v) => !v.eq_ignore_ascii_case("false"),
    }
}

/// Tool settings, optionally loaded from a TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OdeConfig {
    /// Base URL of the cloud API
    pub api_url: String,
    /// Branch new environments are created on before switching
    pub default_branch: String,
    /// Seconds between status checks
    pub poll_interval_secs: u64,
    /// Status checks before giving up
    pub max_poll_attempts: u32,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for OdeConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            default_branch: DEFAULT_BRANCH.to_string(),
            poll_interval_secs: 5,
            max_poll_attempts: 360,
            request_timeout_secs: 30,
        }
    }
}

impl OdeConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> OdeResult<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Create config from TOML string
    pub fn from_toml(content: &str) -> OdeResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn with_env_overrides(self) -> Self {
        self.with_lookup_overrides(|name| std::env::var(name).ok())
    }

    pub fn with_lookup_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
            self.api_url = url;
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> OdeResult<()> {
        if self.api_url.trim().is_empty() {
            return Err(OdeError::config("api_url must not be empty"));
        }
        if self.default_branch.trim().is_empty() {
            return Err(OdeError::config("default_branch must not be empty"));
        }
        if self.max_poll_attempts == 0 {
            return Err(OdeError::config("max_poll_attempts must be at least 1"));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_event_parsing() {
        assert_eq!(PipelineEvent::parse(None), PipelineEvent::Build);
        assert_eq!(PipelineEvent::parse(Some("")), PipelineEvent::Build);
        assert_eq!(PipelineEvent::parse(Some("build")), PipelineEvent::Build);
        assert_eq!(PipelineEvent::parse(Some("merge")), PipelineEvent::Merge);
        assert_eq!(
            PipelineEvent::parse(Some("pull-request")),
            PipelineEvent::Other("pull-request".to_string())
        );
    }

    #[test]
    fn test_build_context_from_lookup() {
        let ctx = BuildContext::from_lookup(lookup(&[
            (ENV_APPLICATION_ID, "app-1"),
            (ENV_DEPLOY_PATH, "feature/x"),
            (ENV_EVENT, "merge"),
        ]))
        .unwrap();
        assert_eq!(ctx.application_id, "app-1");
        assert_eq!(ctx.deploy_path, "feature/x");
        assert_eq!(ctx.event, PipelineEvent::Merge);

        let ctx = BuildContext::from_lookup(lookup(&[
            (ENV_APPLICATION_ID, "app-1"),
            (ENV_DEPLOY_PATH, "feature/x"),
        ]))
        .unwrap();
        assert_eq!(ctx.event, PipelineEvent::Build);
    }

    #[test]
    fn test_build_context_requires_application() {
        let err = BuildContext::from_lookup(lookup(&[(ENV_DEPLOY_PATH, "feature/x")])).unwrap_err();
        assert!(matches!(err, OdeError::Config(msg) if msg.contains(ENV_APPLICATION_ID)));
    }

    #[test]
    fn test_credentials() {
        let creds = Credentials::from_lookup(lookup(&[(ENV_KEY, "k"), (ENV_SECRET, "s")])).unwrap();
        assert_eq!(creds.key, "k");
        assert!(!format!("{:?}", creds).contains("\"s\""));

        let err = Credentials::from_lookup(lookup(&[(ENV_KEY, "k")])).unwrap_err();
        assert!(matches!(err, OdeError::MissingCredentials));

        let err = Credentials::from_lookup(lookup(&[(ENV_KEY, "k"), (ENV_SECRET, "")])).unwrap_err();
        assert!(matches!(err, OdeError::MissingCredentials));
    }

    #[test]
    fn test_debug_flag() {
        assert!(!flag_enabled(None));
        assert!(!flag_enabled(Some("0")));
        assert!(!flag_enabled(Some("FALSE")));
        assert!(flag_enabled(Some("1")));
        assert!(flag_enabled(Some("yes")));
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_branch = \"main\"").unwrap();
        writeln!(file, "poll_interval_secs = 10").unwrap();

        let config = OdeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.default_branch, "main");
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.max_poll_attempts, 360);
    }

    #[test]
    fn test_config_rejects_zero_attempts() {
        let err = OdeConfig::from_toml("max_poll_attempts = 0").unwrap_err();
        assert!(matches!(err, OdeError::Config(_)));
    }

    #[test]
    fn test_env_overrides_api_url() {
        let config = OdeConfig::default()
            .with_lookup_overrides(lookup(&[(ENV_API_URL, "http://localhost:9000/api/")]));
        assert_eq!(config.api_url, "http://localhost:9000/api/");
    }
}
