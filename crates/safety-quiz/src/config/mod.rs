use crate::assessment::{QuizPolicy, ReselectionPolicy, UnansweredPolicy};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the quiz tooling.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub quiz: QuizSettings,
    pub content: ContentConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("QUIZ_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("QUIZ_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let unanswered = match non_empty_var("QUIZ_UNANSWERED_POLICY") {
            Some(raw) => UnansweredPolicy::parse(&raw)
                .ok_or(ConfigError::InvalidUnansweredPolicy { value: raw })?,
            None => UnansweredPolicy::default(),
        };

        let reselection = match non_empty_var("QUIZ_RESELECTION") {
            Some(raw) => ReselectionPolicy::parse(&raw)
                .ok_or(ConfigError::InvalidReselection { value: raw })?,
            None => ReselectionPolicy::default(),
        };

        let pass_threshold_override = non_empty_var("QUIZ_PASS_THRESHOLD")
            .map(|raw| match raw.trim().parse::<u8>() {
                Ok(value) if value <= 100 => Ok(value),
                _ => Err(ConfigError::InvalidPassThreshold { value: raw }),
            })
            .transpose()?;

        let directory = non_empty_var("QUIZ_CONTENT_DIR").map(PathBuf::from);

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            quiz: QuizSettings {
                policy: QuizPolicy {
                    unanswered,
                    reselection,
                },
                pass_threshold_override,
            },
            content: ContentConfig { directory },
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Scoring rules applied to every quiz the tooling starts.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuizSettings {
    pub policy: QuizPolicy,
    /// Replaces each exam's own pass mark when set.
    pub pass_threshold_override: Option<u8>,
}

impl QuizSettings {
    pub fn pass_threshold(&self, configured: u8) -> u8 {
        self.pass_threshold_override.unwrap_or(configured)
    }
}

/// Where course banks are read from; the embedded library when unset.
#[derive(Debug, Clone, Default)]
pub struct ContentConfig {
    pub directory: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidUnansweredPolicy { value: String },
    InvalidReselection { value: String },
    InvalidPassThreshold { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidUnansweredPolicy { value } => write!(
                f,
                "QUIZ_UNANSWERED_POLICY must be 'score_as_incorrect' or 'require_all', got '{}'",
                value
            ),
            ConfigError::InvalidReselection { value } => write!(
                f,
                "QUIZ_RESELECTION must be 'overwrite' or 'lock_first', got '{}'",
                value
            ),
            ConfigError::InvalidPassThreshold { value } => write!(
                f,
                "QUIZ_PASS_THRESHOLD must be a whole percentage between 0 and 100, got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("QUIZ_ENV");
        env::remove_var("QUIZ_LOG_LEVEL");
        env::remove_var("QUIZ_UNANSWERED_POLICY");
        env::remove_var("QUIZ_RESELECTION");
        env::remove_var("QUIZ_PASS_THRESHOLD");
        env::remove_var("QUIZ_CONTENT_DIR");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.quiz.policy, QuizPolicy::default());
        assert_eq!(config.quiz.pass_threshold(80), 80);
        assert!(config.content.directory.is_none());
    }

    #[test]
    fn reads_policies_and_threshold_override() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("QUIZ_ENV", "ci");
        env::set_var("QUIZ_UNANSWERED_POLICY", "require_all");
        env::set_var("QUIZ_RESELECTION", "lock_first");
        env::set_var("QUIZ_PASS_THRESHOLD", "70");
        env::set_var("QUIZ_CONTENT_DIR", "/srv/quiz-content");

        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Test);
        assert_eq!(config.quiz.policy.unanswered, UnansweredPolicy::RequireAll);
        assert_eq!(config.quiz.policy.reselection, ReselectionPolicy::LockFirst);
        assert_eq!(config.quiz.pass_threshold(80), 70);
        assert_eq!(
            config.content.directory,
            Some(PathBuf::from("/srv/quiz-content"))
        );
    }

    #[test]
    fn rejects_threshold_above_one_hundred() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("QUIZ_PASS_THRESHOLD", "120");
        let err = AppConfig::load().expect_err("threshold out of range");
        reset_env();
        assert!(matches!(err, ConfigError::InvalidPassThreshold { .. }));
    }

    #[test]
    fn rejects_unknown_reselection_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("QUIZ_RESELECTION", "sometimes");
        let err = AppConfig::load().expect_err("policy is unknown");
        reset_env();
        assert!(err.to_string().contains("sometimes"));
    }
}
