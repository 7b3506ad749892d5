mod file_config;

pub use file_config::{AgentConfig, AgentLlmConfig, FileConfig};

use crate::agent::llm::{ApiKeySource, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::agent::workflow::{AssistantOptions, DEFAULT_MAX_COMPLETION_TOKENS};
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the model API key.
pub const LLM_API_KEY_ENV: &str = "GROQ_API_KEY";
/// Environment variable holding the token signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

const DEFAULT_JWT_TTL_DAYS: i64 = 30;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub jwt_secret: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub jwt_secret: String,
    pub jwt_ttl: chrono::Duration,
    pub agent: AgentSettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present, the environment fills
    /// in secrets given nowhere else.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        Self::resolve_with_env(cli, file_config, |key| std::env::var(key).ok())
    }

    fn resolve_with_env(
        cli: &CliConfig,
        file_config: Option<FileConfig>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;

        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let jwt_secret = file
            .jwt_secret
            .or_else(|| cli.jwt_secret.clone())
            .or_else(|| env(JWT_SECRET_ENV))
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "jwt secret must be specified via --jwt-secret, the config file or {}",
                    JWT_SECRET_ENV
                )
            })?;

        let jwt_ttl_days = file.jwt_ttl_days.unwrap_or(DEFAULT_JWT_TTL_DAYS);
        if jwt_ttl_days <= 0 {
            bail!("jwt_ttl_days must be positive, got {}", jwt_ttl_days);
        }

        let agent_file = file.agent.unwrap_or_default();
        let agent_llm_file = agent_file.llm.unwrap_or_default();
        let agent_llm_defaults = AgentLlmSettings::default();
        let agent = AgentSettings {
            max_completion_tokens: agent_file
                .max_completion_tokens
                .unwrap_or(DEFAULT_MAX_COMPLETION_TOKENS),
            llm: AgentLlmSettings {
                base_url: agent_llm_file
                    .base_url
                    .unwrap_or(agent_llm_defaults.base_url),
                model: agent_llm_file.model.unwrap_or(agent_llm_defaults.model),
                api_key: agent_llm_file.api_key.or_else(|| env(LLM_API_KEY_ENV)),
                api_key_command: agent_llm_file.api_key_command,
                temperature: agent_llm_file
                    .temperature
                    .unwrap_or(agent_llm_defaults.temperature),
                timeout_secs: agent_llm_file
                    .timeout_secs
                    .unwrap_or(agent_llm_defaults.timeout_secs),
            },
        };

        Ok(Self {
            db_dir,
            port,
            metrics_port,
            logging_level,
            jwt_secret,
            jwt_ttl: chrono::Duration::days(jwt_ttl_days),
            agent,
        })
    }

    pub fn inventory_db_path(&self) -> PathBuf {
        self.db_dir.join("inventory.db")
    }

    pub fn user_db_path(&self) -> PathBuf {
        self.db_dir.join("user.db")
    }
}

#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub max_completion_tokens: u32,
    pub llm: AgentLlmSettings,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_completion_tokens: DEFAULT_MAX_COMPLETION_TOKENS,
            llm: AgentLlmSettings::default(),
        }
    }
}

impl AgentSettings {
    pub fn assistant_options(&self) -> AssistantOptions {
        AssistantOptions::new(
            self.llm.temperature,
            self.max_completion_tokens,
            Duration::from_secs(self.llm.timeout_secs),
        )
    }
}

/// Settings for the chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct AgentLlmSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub api_key_command: Option<String>,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for AgentLlmSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            api_key_command: None,
            temperature: 0.3,
            timeout_secs: 120,
        }
    }
}

impl AgentLlmSettings {
    /// A key command wins over a static key.
    pub fn api_key_source(&self) -> ApiKeySource {
        match (&self.api_key_command, &self.api_key) {
            (Some(command), _) => ApiKeySource::Command(command.clone()),
            (None, Some(key)) => ApiKeySource::Static(key.clone()),
            (None, None) => ApiKeySource::None,
        }
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn cli_with_dir(temp_dir: &TempDir) -> CliConfig {
        CliConfig {
            db_dir: Some(temp_dir.path().to_path_buf()),
            port: 3001,
            metrics_port: 9091,
            jwt_secret: Some("cli-secret".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_logging_level() {
        assert!(matches!(
            parse_logging_level("none"),
            Some(RequestsLoggingLevel::None)
        ));
        assert!(matches!(
            parse_logging_level("body"),
            Some(RequestsLoggingLevel::Body)
        ));
        assert!(matches!(
            parse_logging_level("PATH"),
            Some(RequestsLoggingLevel::Path)
        ));
        assert!(parse_logging_level("invalid").is_none());
    }

    #[test]
    fn test_resolve_cli_only() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            logging_level: RequestsLoggingLevel::Headers,
            ..cli_with_dir(&temp_dir)
        };

        let config = AppConfig::resolve_with_env(&cli, None, no_env).unwrap();

        assert_eq!(config.db_dir, temp_dir.path());
        assert_eq!(config.port, 3001);
        assert_eq!(config.metrics_port, 9091);
        assert_eq!(config.logging_level, RequestsLoggingLevel::Headers);
        assert_eq!(config.jwt_secret, "cli-secret");
        assert_eq!(config.jwt_ttl, chrono::Duration::days(30));
        assert_eq!(config.agent.max_completion_tokens, 4096);
        assert_eq!(config.agent.llm.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.agent.llm.model, DEFAULT_MODEL);
        assert!(matches!(
            config.agent.llm.api_key_source(),
            ApiKeySource::None
        ));
        assert_eq!(config.inventory_db_path(), temp_dir.path().join("inventory.db"));
        assert_eq!(config.user_db_path(), temp_dir.path().join("user.db"));
    }

    #[test]
    fn test_resolve_toml_overrides_cli() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            db_dir: Some(PathBuf::from("/should/be/overridden")),
            logging_level: RequestsLoggingLevel::Path,
            ..cli_with_dir(&temp_dir)
        };

        let file_config = FileConfig {
            db_dir: Some(temp_dir.path().to_string_lossy().to_string()),
            port: Some(4000),
            logging_level: Some("body".to_string()),
            jwt_secret: Some("file-secret".to_string()),
            jwt_ttl_days: Some(1),
            agent: Some(AgentConfig {
                max_completion_tokens: Some(512),
                llm: Some(AgentLlmConfig {
                    model: Some("other-model".to_string()),
                    api_key: Some("file-key".to_string()),
                    ..Default::default()
                }),
            }),
            ..Default::default()
        };

        let config = AppConfig::resolve_with_env(&cli, Some(file_config), no_env).unwrap();

        assert_eq!(config.db_dir, temp_dir.path());
        assert_eq!(config.port, 4000);
        assert_eq!(config.logging_level, RequestsLoggingLevel::Body);
        assert_eq!(config.jwt_secret, "file-secret");
        assert_eq!(config.jwt_ttl, chrono::Duration::days(1));
        // CLI value used when TOML doesn't specify
        assert_eq!(config.metrics_port, 9091);
        assert_eq!(config.agent.max_completion_tokens, 512);
        assert_eq!(config.agent.llm.model, "other-model");
        assert_eq!(config.agent.llm.base_url, DEFAULT_BASE_URL);
        assert!(matches!(
            config.agent.llm.api_key_source(),
            ApiKeySource::Static(key) if key == "file-key"
        ));
    }

    #[test]
    fn test_secrets_fall_back_to_environment() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            jwt_secret: None,
            ..cli_with_dir(&temp_dir)
        };
        let env = |key: &str| match key {
            JWT_SECRET_ENV => Some("env-secret".to_string()),
            LLM_API_KEY_ENV => Some("env-key".to_string()),
            _ => None,
        };

        let config = AppConfig::resolve_with_env(&cli, None, env).unwrap();
        assert_eq!(config.jwt_secret, "env-secret");
        assert_eq!(config.agent.llm.api_key.as_deref(), Some("env-key"));
    }

    #[test]
    fn test_resolve_missing_jwt_secret_error() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            jwt_secret: None,
            ..cli_with_dir(&temp_dir)
        };
        let err = AppConfig::resolve_with_env(&cli, None, no_env).unwrap_err();
        assert!(err.to_string().contains("jwt secret must be specified"));
    }

    #[test]
    fn test_resolve_missing_db_dir_error() {
        let cli = CliConfig::default();
        let result = AppConfig::resolve_with_env(&cli, None, no_env);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("db_dir must be specified"));
    }

    #[test]
    fn test_resolve_nonexistent_db_dir_error() {
        let cli = CliConfig {
            db_dir: Some(PathBuf::from("/nonexistent/path/that/should/not/exist")),
            jwt_secret: Some("x".to_string()),
            ..Default::default()
        };
        let result = AppConfig::resolve_with_env(&cli, None, no_env);
        assert!(result.unwrap_err().to_string().contains("does not exist"));
    }

    #[test]
    fn test_resolve_db_dir_not_directory_error() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let cli = CliConfig {
            db_dir: Some(temp_file.path().to_path_buf()),
            ..Default::default()
        };
        let result = AppConfig::resolve_with_env(&cli, None, no_env);
        assert!(result.unwrap_err().to_string().contains("not a directory"));
    }

    #[test]
    fn test_api_key_command_wins() {
        let settings = AgentLlmSettings {
            api_key: Some("static".to_string()),
            api_key_command: Some("echo rotated".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            settings.api_key_source(),
            ApiKeySource::Command(cmd) if cmd == "echo rotated"
        ));
    }

    #[test]
    fn test_assistant_options_follow_settings() {
        let settings = AgentSettings {
            max_completion_tokens: 256,
            llm: AgentLlmSettings {
                temperature: 0.0,
                timeout_secs: 5,
                ..Default::default()
            },
        };
        let options = settings.assistant_options();
        assert_eq!(options.first_call.max_tokens, Some(256));
        assert_eq!(options.first_call.temperature, 0.0);
        assert_eq!(options.final_call.timeout, Duration::from_secs(5));
        assert!(options.final_call.tool_choice.is_none());
    }
}
