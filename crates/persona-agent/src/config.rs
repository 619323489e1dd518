//! Runtime configuration read from the environment.
//!
//! A `.env` file in the working directory is loaded first when present.
//! Variables already set in the environment take precedence over it.

use std::env;
use std::fmt::{self, Debug};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use persona_agent_openai_model::{OpenAIConfig, OpenAIConfigBuilder};
use thiserror::Error;

const DEFAULT_PROFILE_NAME_PATH: &str = "data/name.txt";
const DEFAULT_PROFILE_PATH: &str = "data/profile.md";
const DEFAULT_LOG_DIR: &str = "logs";

/// The error returned when the process cannot be configured.
///
/// Every variant is fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set or is empty.
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A variable is set to a value that cannot be parsed.
    #[error("invalid value for {name}: {value:?}")]
    InvalidVar {
        /// The variable name.
        name: &'static str,
        /// The raw value.
        value: String,
    },

    /// A profile file cannot be read.
    #[error("failed to read profile file {}: {source}", path.display())]
    ReadProfile {
        /// The file that was read.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// The display name file is empty.
    #[error("profile name in {} is empty", path.display())]
    EmptyProfile {
        /// The file that was read.
        path: PathBuf,
    },
}

/// Settings of one model backend.
#[derive(Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// The credential sent to the backend.
    pub api_key: String,
    /// Overrides the provider's default model.
    pub model: Option<String>,
    /// Overrides the provider's default endpoint.
    pub base_url: Option<String>,
}

impl Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("api_key", &"<deducted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Everything the binary needs to start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// The backend drafting replies, an OpenAI endpoint by default.
    pub responder: BackendConfig,
    /// The backend judging replies, Gemini by default.
    pub evaluator: BackendConfig,
    /// Per-request timeout applied to both backends.
    pub request_timeout: Option<Duration>,
    /// Overrides the agent's default tool round limit.
    pub max_tool_rounds: Option<usize>,
    /// The file holding the persona's display name.
    pub profile_name_path: PathBuf,
    /// The file holding the persona's profile document.
    pub profile_path: PathBuf,
    /// Where log files are written.
    pub log_dir: PathBuf,
}

impl Config {
    /// Loads `.env` if present and reads the configuration from the process
    /// environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("loaded environment from {}", path.display()),
            Err(err) if err.not_found() => {}
            Err(err) => warn!("ignoring malformed .env file: {err}"),
        }
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of
    /// a variable if it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);
        let request_timeout = vars
            .parse::<u64>("REQUEST_TIMEOUT_SECS")?
            .map(Duration::from_secs);

        Ok(Self {
            responder: BackendConfig {
                api_key: vars.required("OPENAI_API_KEY")?,
                model: vars.optional("RESPONDER_MODEL"),
                base_url: vars.optional("RESPONDER_BASE_URL"),
            },
            evaluator: BackendConfig {
                api_key: vars.required("GEMINI_API_KEY")?,
                model: vars.optional("EVALUATOR_MODEL"),
                base_url: vars.optional("EVALUATOR_BASE_URL"),
            },
            request_timeout,
            max_tool_rounds: vars.parse("MAX_TOOL_ROUNDS")?,
            profile_name_path: vars
                .path("PROFILE_NAME_PATH", DEFAULT_PROFILE_NAME_PATH),
            profile_path: vars.path("PROFILE_PATH", DEFAULT_PROFILE_PATH),
            log_dir: vars.path("LOG_DIR", DEFAULT_LOG_DIR),
        })
    }

    /// Returns the provider configuration of the responder backend.
    pub fn responder_provider_config(&self) -> OpenAIConfig {
        let builder =
            OpenAIConfigBuilder::with_api_key(self.responder.api_key.clone());
        self.finish_builder(builder, &self.responder)
    }

    /// Returns the provider configuration of the evaluator backend.
    pub fn evaluator_provider_config(&self) -> OpenAIConfig {
        let builder = OpenAIConfigBuilder::gemini(self.evaluator.api_key.clone());
        self.finish_builder(builder, &self.evaluator)
    }

    fn finish_builder(
        &self,
        mut builder: OpenAIConfigBuilder,
        backend: &BackendConfig,
    ) -> OpenAIConfig {
        if let Some(model) = &backend.model {
            builder = builder.with_model(model.clone());
        }
        if let Some(base_url) = &backend.base_url {
            builder = builder.with_base_url(base_url.clone());
        }
        if let Some(timeout) = self.request_timeout {
            builder = builder.with_timeout(timeout);
        }
        builder.build()
    }
}

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    fn optional(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.optional(name).ok_or(ConfigError::MissingVar(name))
    }

    fn parse<T: FromStr>(
        &self,
        name: &'static str,
    ) -> Result<Option<T>, ConfigError> {
        self.optional(name)
            .map(|value| {
                value
                    .parse()
                    .map_err(|_| ConfigError::InvalidVar { name, value })
            })
            .transpose()
    }

    fn path(&self, name: &str, default: &str) -> PathBuf {
        self.optional(name).unwrap_or_else(|| default.to_owned()).into()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config =
            load(&[("OPENAI_API_KEY", "sk-1"), ("GEMINI_API_KEY", "g-1")])
                .unwrap();
        assert_eq!(config.responder.api_key, "sk-1");
        assert_eq!(config.evaluator.api_key, "g-1");
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.max_tool_rounds, None);
        assert_eq!(config.profile_name_path, PathBuf::from("data/name.txt"));
        assert_eq!(config.profile_path, PathBuf::from("data/profile.md"));
        assert_eq!(config.log_dir, PathBuf::from("logs"));

        assert_eq!(config.responder_provider_config().model(), "gpt-4o-mini");
        assert_eq!(
            config.evaluator_provider_config().model(),
            "gemini-2.0-flash"
        );
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("OPENAI_API_KEY", "sk-1"),
            ("GEMINI_API_KEY", "g-1"),
            ("RESPONDER_MODEL", "gpt-4.1"),
            ("EVALUATOR_BASE_URL", "http://localhost:8080/v1/"),
            ("REQUEST_TIMEOUT_SECS", "30"),
            ("MAX_TOOL_ROUNDS", "2"),
            ("LOG_DIR", "/var/log/persona"),
        ])
        .unwrap();
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.max_tool_rounds, Some(2));
        assert_eq!(config.log_dir, PathBuf::from("/var/log/persona"));
        assert_eq!(config.responder_provider_config().model(), "gpt-4.1");
        assert_eq!(
            config.evaluator_provider_config().base_url(),
            "http://localhost:8080/v1"
        );
    }

    #[test]
    fn test_missing_credentials() {
        let err = load(&[("GEMINI_API_KEY", "g-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("OPENAI_API_KEY")));

        let err = load(&[("OPENAI_API_KEY", "sk-1"), ("GEMINI_API_KEY", " ")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("GEMINI_API_KEY")));
    }

    #[test]
    fn test_invalid_numbers() {
        let err = load(&[
            ("OPENAI_API_KEY", "sk-1"),
            ("GEMINI_API_KEY", "g-1"),
            ("MAX_TOOL_ROUNDS", "many"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidVar { name: "MAX_TOOL_ROUNDS", .. }
        ));
    }

    #[test]
    fn test_debug_hides_keys() {
        let config =
            load(&[("OPENAI_API_KEY", "sk-secret"), ("GEMINI_API_KEY", "g-1")])
                .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<deducted>"));
    }
}
