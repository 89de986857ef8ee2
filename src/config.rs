use std::env;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

/// Default word budget applied to every chunk sent to the completion service.
pub const DEFAULT_MAX_WORDS_PER_CHUNK: usize = 10_000;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
const DEFAULT_USPTO_BASE_URL: &str = "https://api.uspto.gov/api/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
const DEFAULT_OLLAMA_MODEL: &str = "llama3.1";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the summarization service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Completion backend used for chunk and merge calls.
    pub llm_provider: LlmProvider,
    /// Model identifier passed to the completion backend.
    pub llm_model: String,
    /// API key for the OpenAI-compatible backend.
    pub openai_api_key: Option<String>,
    /// Base URL of the OpenAI-compatible backend.
    pub openai_base_url: String,
    /// Base URL of the Ollama runtime.
    pub ollama_url: String,
    /// Deadline applied to each completion call.
    pub llm_timeout: Duration,
    /// Optional API key for the document source.
    pub uspto_api_key: Option<String>,
    /// Base URL of the document source.
    pub uspto_base_url: String,
    /// Deadline applied to each document fetch.
    pub document_timeout: Duration,
    /// Maximum number of words per chunk.
    pub max_words_per_chunk: usize,
    /// Maximum number of chunk completions in flight for one request.
    pub summary_concurrency: usize,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

/// Supported completion backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LlmProvider {
    /// Hosted OpenAI chat completions (or any compatible gateway).
    OpenAI,
    /// Local Ollama runtime.
    Ollama,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let llm_provider = match load_env_optional("LLM_PROVIDER") {
            Some(value) => value
                .parse()
                .map_err(|()| ConfigError::InvalidValue("LLM_PROVIDER".to_string()))?,
            None => LlmProvider::OpenAI,
        };
        let openai_api_key = load_env_optional("OPENAI_API_KEY");
        if llm_provider == LlmProvider::OpenAI && openai_api_key.is_none() {
            return Err(ConfigError::MissingVariable("OPENAI_API_KEY".to_string()));
        }
        let llm_model = load_env_optional("LLM_MODEL").unwrap_or_else(|| {
            match llm_provider {
                LlmProvider::OpenAI => DEFAULT_OPENAI_MODEL,
                LlmProvider::Ollama => DEFAULT_OLLAMA_MODEL,
            }
            .to_string()
        });

        let max_words_per_chunk: usize =
            parse_optional("MAX_WORDS_PER_CHUNK")?.unwrap_or(DEFAULT_MAX_WORDS_PER_CHUNK);
        if max_words_per_chunk == 0 {
            return Err(ConfigError::InvalidValue("MAX_WORDS_PER_CHUNK".to_string()));
        }
        let summary_concurrency: usize = parse_optional("SUMMARY_CONCURRENCY")?.unwrap_or(1);
        if summary_concurrency == 0 {
            return Err(ConfigError::InvalidValue("SUMMARY_CONCURRENCY".to_string()));
        }

        Ok(Self {
            llm_provider,
            llm_model,
            openai_api_key,
            openai_base_url: load_env_optional("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            ollama_url: load_env_optional("OLLAMA_URL")
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            llm_timeout: Duration::from_secs(parse_optional("LLM_TIMEOUT_SECS")?.unwrap_or(300)),
            uspto_api_key: load_env_optional("USPTO_API_KEY"),
            uspto_base_url: load_env_optional("USPTO_BASE_URL")
                .unwrap_or_else(|| DEFAULT_USPTO_BASE_URL.to_string()),
            document_timeout: Duration::from_secs(
                parse_optional("DOCUMENT_TIMEOUT_SECS")?.unwrap_or(60),
            ),
            max_words_per_chunk,
            summary_concurrency,
            server_port: parse_optional("SERVER_PORT")?,
        })
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

impl std::str::FromStr for LlmProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            _ => Err(()),
        }
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        provider = ?config.llm_provider,
        model = %config.llm_model,
        uspto_base_url = %config.uspto_base_url,
        max_words_per_chunk = config.max_words_per_chunk,
        summary_concurrency = config.summary_concurrency,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    Ok(CONFIG.get_or_init(|| config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parsing_is_case_insensitive() {
        assert_eq!("OpenAI".parse::<LlmProvider>(), Ok(LlmProvider::OpenAI));
        assert_eq!(" ollama ".parse::<LlmProvider>(), Ok(LlmProvider::Ollama));
        assert!("anthropic".parse::<LlmProvider>().is_err());
    }
}
