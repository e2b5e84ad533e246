use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

const DEFAULT_RESUME_PATH: &str = "./data/resume.pdf";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "text-embedding-3-small";
const DEFAULT_OLLAMA_MODEL: &str = "nomic-embed-text";
const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_WEB_ORIGIN: &str = "http://localhost:3000";

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

/// Runtime configuration for the CV MCP server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Location of the résumé that is parsed and indexed at startup.
    pub resume_path: PathBuf,
    /// Embedding provider used to rank chunks, or `None` for keyword-only ranking.
    pub embedding_provider: Option<EmbeddingProvider>,
    /// Embedding model identifier passed to the provider.
    pub embedding_model: String,
    /// Credential for the OpenAI embeddings API.
    pub openai_api_key: Option<String>,
    /// Base URL of the OpenAI-compatible API.
    pub openai_base_url: String,
    /// Base URL of the Ollama runtime.
    pub ollama_url: String,
    /// HTTP server port.
    pub server_port: u16,
    /// Origin allowed to call the HTTP surface from a browser.
    pub web_origin: String,
}

/// Supported embedding backends for the résumé index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmbeddingProvider {
    /// Local Ollama runtime.
    Ollama,
    /// Hosted OpenAI embeddings API.
    OpenAI,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let openai_api_key = load_env_optional("OPENAI_API_KEY");
        let embedding_provider = match load_env_optional("EMBEDDING_PROVIDER") {
            Some(value) if value.eq_ignore_ascii_case("none") => None,
            Some(value) => Some(
                value
                    .parse::<EmbeddingProvider>()
                    .map_err(|()| ConfigError::InvalidValue("EMBEDDING_PROVIDER".into()))?,
            ),
            None => openai_api_key.as_ref().map(|_| EmbeddingProvider::OpenAI),
        };
        if embedding_provider == Some(EmbeddingProvider::OpenAI) && openai_api_key.is_none() {
            return Err(ConfigError::MissingVariable("OPENAI_API_KEY".into()));
        }

        let embedding_model = load_env_optional("EMBEDDING_MODEL").unwrap_or_else(|| {
            match embedding_provider {
                Some(EmbeddingProvider::Ollama) => DEFAULT_OLLAMA_MODEL,
                _ => DEFAULT_OPENAI_MODEL,
            }
            .to_string()
        });

        Ok(Self {
            resume_path: load_env_optional("RESUME_PATH")
                .unwrap_or_else(|| DEFAULT_RESUME_PATH.to_string())
                .into(),
            embedding_provider,
            embedding_model,
            openai_api_key,
            openai_base_url: load_env_optional("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            ollama_url: load_env_optional("OLLAMA_URL")
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| ("SERVER_PORT", value))
                .or_else(|| load_env_optional("PORT").map(|value| ("PORT", value)))
                .map(|(key, value)| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue(key.into()))
                })
                .transpose()?
                .unwrap_or(DEFAULT_SERVER_PORT),
            web_origin: load_env_optional("WEB_ORIGIN")
                .unwrap_or_else(|| DEFAULT_WEB_ORIGIN.to_string()),
        })
    }

    /// Human-readable label for the active embedding mode.
    pub fn embedding_label(&self) -> &'static str {
        match self.embedding_provider {
            Some(EmbeddingProvider::OpenAI) => "openai",
            Some(EmbeddingProvider::Ollama) => "ollama",
            None => "disabled",
        }
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

impl std::str::FromStr for EmbeddingProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAI),
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
///
/// Command-line overrides are applied by the caller through `overrides` before the value is
/// frozen.
pub fn init_config(overrides: impl FnOnce(&mut Config)) -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let mut config = Config::from_env()?;
    overrides(&mut config);
    tracing::debug!(
        resume_path = %config.resume_path.display(),
        embedding_provider = config.embedding_label(),
        embedding_model = %config.embedding_model,
        server_port = config.server_port,
        "Loaded configuration"
    );
    Ok(CONFIG.get_or_init(|| config))
}
