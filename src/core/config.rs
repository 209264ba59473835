//! Pipeline configuration
//!
//! [`LoggerConfig`] is a plain record; binding it from YAML, env or flags is
//! left to the application. Every field has a default so partial documents
//! deserialize.

use super::error::Result;
use super::log_level::LogLevel;
use super::sampling::SamplingPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Destination sentinel for standard output
pub const STDOUT: &str = "stdout";
/// Destination sentinel for standard error
pub const STDERR: &str = "stderr";

/// Deployment mode, which decides the encoders in use
///
/// `Local` writes human-readable output only. `Dev` and `Prod` additionally
/// export machine-readable records when an export path is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Environment {
    #[default]
    Local,
    Dev,
    Prod,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }

    /// Whether a configured export path is honored
    pub fn exports(&self) -> bool {
        matches!(self, Environment::Dev | Environment::Prod)
    }

    /// Lenient parse: unknown names fall back to `Local`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "dev" | "development" => Environment::Dev,
            "prod" | "production" => Environment::Prod,
            _ => Environment::Local,
        }
    }
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Environment> for String {
    fn from(env: Environment) -> Self {
        env.as_str().to_string()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative description of a logging pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Minimum enabled level; unknown names mean `info`
    pub level: String,

    pub environment: Environment,

    /// Human-readable destinations: `stdout`, `stderr` or file paths
    pub output_paths: Vec<String>,

    /// Machine-readable destination, used in `dev` and `prod` only
    pub export_path: Option<String>,

    /// `None` or `initial == 0` disables sampling
    pub sampling: Option<SamplingPolicy>,

    pub disable_caller: bool,

    pub disable_stacktrace: bool,

    /// Minimum level at which a stacktrace is captured; empty means `error`
    pub stacktrace_level: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            environment: Environment::Local,
            output_paths: vec![STDOUT.to_string()],
            export_path: None,
            sampling: Some(SamplingPolicy::default()),
            disable_caller: false,
            disable_stacktrace: false,
            stacktrace_level: "error".to_string(),
        }
    }
}

impl LoggerConfig {
    /// Parse a JSON document, filling absent fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Configured minimum level
    pub fn min_level(&self) -> LogLevel {
        LogLevel::parse_or_default(&self.level)
    }

    /// Stacktrace trigger level, or `None` when capture is disabled
    pub fn stacktrace_threshold(&self) -> Option<LogLevel> {
        if self.disable_stacktrace {
            return None;
        }
        if self.stacktrace_level.trim().is_empty() {
            return Some(LogLevel::Error);
        }
        Some(LogLevel::parse_or_default(&self.stacktrace_level))
    }

    /// Sampling policy to apply, if any
    pub fn effective_sampling(&self) -> Option<SamplingPolicy> {
        self.sampling.filter(SamplingPolicy::is_enabled)
    }

    /// Export destination, if the environment honors it
    pub fn effective_export_path(&self) -> Option<&str> {
        self.export_path
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty() && self.environment.exports())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.min_level(), LogLevel::Info);
        assert_eq!(config.environment, Environment::Local);
        assert_eq!(config.output_paths, vec!["stdout"]);
        assert_eq!(config.stacktrace_threshold(), Some(LogLevel::Error));
        assert_eq!(config.effective_sampling(), Some(SamplingPolicy::new(100, 100)));
        assert_eq!(config.effective_export_path(), None);
    }

    #[test]
    fn test_partial_json() {
        let config = LoggerConfig::from_json(
            r#"{"level": "debug", "environment": "production", "export_path": "/tmp/app.json"}"#,
        )
        .expect("parse");

        assert_eq!(config.min_level(), LogLevel::Debug);
        assert_eq!(config.environment, Environment::Prod);
        assert_eq!(config.output_paths, vec!["stdout"]);
        assert_eq!(config.effective_export_path(), Some("/tmp/app.json"));
        assert!(config.sampling.is_some());
    }

    #[test]
    fn test_export_ignored_locally() {
        let config = LoggerConfig {
            export_path: Some("/tmp/app.json".to_string()),
            ..LoggerConfig::default()
        };
        assert_eq!(config.effective_export_path(), None);
    }

    #[test]
    fn test_lenient_values() {
        let config = LoggerConfig::from_json(
            r#"{"level": "verbose", "environment": "staging", "stacktrace_level": "", "sampling": null}"#,
        )
        .expect("parse");

        assert_eq!(config.min_level(), LogLevel::Info);
        assert_eq!(config.environment, Environment::Local);
        assert_eq!(config.stacktrace_threshold(), Some(LogLevel::Error));
        assert_eq!(config.effective_sampling(), None);
    }

    #[test]
    fn test_sampling_disabled_by_zero_initial() {
        let config = LoggerConfig::from_json(r#"{"sampling": {"initial": 0, "thereafter": 10}}"#)
            .expect("parse");
        assert_eq!(config.effective_sampling(), None);

        let config = LoggerConfig {
            disable_stacktrace: true,
            ..LoggerConfig::default()
        };
        assert_eq!(config.stacktrace_threshold(), None);
    }

    #[test]
    fn test_environment_serialization() {
        let json = serde_json::to_string(&Environment::Dev).expect("serialize");
        assert_eq!(json, "\"dev\"");
        assert_eq!(Environment::parse(" DEVELOPMENT "), Environment::Dev);
        assert_eq!(Environment::Prod.to_string(), "prod");
    }
}
