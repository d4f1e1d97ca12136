//! Configuration management for ragline.
//!
//! Configuration is layered, lowest precedence first:
//! - Built-in defaults
//! - Config file (`ragline.yaml` in the working directory, or an explicit path)
//! - Environment variables (a `.env` file is loaded into the environment first)
//! - Command-line flags
//!
//! The raw settings are resolved once at startup into [`LlmSettings`] and
//! [`EmbeddingSettings`], which are handed to the provider factories. Nothing
//! downstream reads the process environment.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "ragline.yaml";

/// Default number of passages fetched by the retrieval stage.
pub const DEFAULT_TOP_K: usize = 4;

const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";

/// Language model backends the pipeline can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    OpenAI,
    Gemini,
    Ollama,
}

impl LlmBackend {
    /// Parse backend from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Some(Self::OpenAI),
            "gemini" | "google" => Some(Self::Gemini),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    /// Get the canonical backend name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
        }
    }

    /// Model used when none is configured.
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAI => "gpt-4o-mini",
            Self::Gemini => "gemini-1.5-flash",
            Self::Ollama => "llama3.2",
        }
    }
}

/// Embedding backends used by the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    OpenAI,
    Gemini,
    /// Local deterministic trigram hashing, for offline use and tests
    Trigram,
}

impl EmbeddingBackend {
    /// Map a configured name to a backend.
    ///
    /// Anything that is not `openai` or `trigram` selects Gemini.
    pub fn from_setting(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "openai" => Self::OpenAI,
            "trigram" | "mock" => Self::Trigram,
            _ => Self::Gemini,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Gemini => "gemini",
            Self::Trigram => "trigram",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAI => "text-embedding-3-large",
            Self::Gemini => "models/embedding-001",
            Self::Trigram => "trigram-v1",
        }
    }
}

/// Resolved language model binding.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    pub backend: LlmBackend,
    pub model: String,
    pub temperature: f32,
    pub api_key: Option<String>,
    /// Custom base URL; `None` uses the backend's public endpoint
    pub endpoint: Option<String>,
}

/// Resolved embedding binding.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingSettings {
    pub backend: EmbeddingBackend,
    pub model: String,
    pub api_key: Option<String>,
}

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Config file that was merged, if any
    pub config_file: Option<PathBuf>,

    /// Requested LLM backend ("openai", "gemini", "ollama")
    pub llm_provider: String,

    /// LLM model override
    pub llm_model: Option<String>,

    /// Generation temperature
    pub temperature: f32,

    /// Ollama base URL; ignored by the hosted backends
    pub ollama_url: Option<String>,

    /// Requested embedding backend ("openai", "gemini", "trigram")
    pub embedding_provider: String,

    /// Embedding model override
    pub embedding_model: Option<String>,

    pub openai_api_key: Option<String>,
    pub google_api_key: Option<String>,

    /// Directory holding the document store files
    pub store_dir: PathBuf,

    /// Collection name inside the store directory
    pub collection: String,

    /// Passages fetched per query
    pub top_k: usize,

    /// Directory with prompt definition overrides
    pub prompts_dir: Option<PathBuf>,

    /// HTTP bind host
    pub host: String,

    /// HTTP bind port
    pub port: u16,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Emit logs as JSON lines
    pub log_json: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    llm: LlmSection,
    embeddings: EmbeddingsSection,
    store: StoreSection,
    prompts: PromptsSection,
    server: ServerSection,
    logging: LoggingSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct EmbeddingsSection {
    provider: Option<String>,
    model: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct StoreSection {
    dir: Option<PathBuf>,
    collection: Option<String>,
    top_k: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PromptsSection {
    dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
    json: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            llm_provider: "openai".to_string(),
            llm_model: None,
            temperature: 0.0,
            ollama_url: None,
            embedding_provider: "openai".to_string(),
            embedding_model: None,
            openai_api_key: None,
            google_api_key: None,
            store_dir: PathBuf::from("./docstore"),
            collection: "agentic-ai".to_string(),
            top_k: DEFAULT_TOP_K,
            prompts_dir: None,
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_level: None,
            verbose: false,
            no_color: false,
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the config file and the environment.
    ///
    /// Environment variables:
    /// - `RAGLINE_CONFIG`: Config file path (when `config_file` is `None`)
    /// - `LLM_PROVIDER`, `LLM_MODEL`, `LLM_TEMPERATURE`, `OLLAMA_URL`
    /// - `EMBEDDING_MODEL` (backend), `EMBEDDING_MODEL_NAME`
    /// - `OPENAI_API_KEY`, `GOOGLE_API_KEY`
    /// - `DOCSTORE_DIR`, `DOCSTORE_COLLECTION`, `RAGLINE_PROMPTS_DIR`
    /// - `RAGLINE_HOST`, `RAGLINE_PORT`
    /// - `RUST_LOG`, `NO_COLOR`
    ///
    /// # Example
    /// ```no_run
    /// use ragline_core::config::AppConfig;
    ///
    /// let config = AppConfig::load(None).expect("Failed to load config");
    /// println!("Store: {:?}", config.store_dir);
    /// ```
    pub fn load(config_file: Option<&Path>) -> AppResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {:?}", path);
        }

        let explicit = config_file
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("RAGLINE_CONFIG").ok().map(PathBuf::from));

        let mut config = Self::default();

        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        path
                    )));
                }
                config = config.merge_yaml(&path)?;
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    config = config.merge_yaml(&path)?;
                }
            }
        }

        config.apply_env(|key| std::env::var(key).ok())
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let mut result = self.merge_yaml_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;
        result.config_file = Some(path.to_path_buf());

        Ok(result)
    }

    fn merge_yaml_str(&self, contents: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file parses as null rather than an empty mapping
        let file: ConfigFile = if contents.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(contents)?
        };

        let mut result = self.clone();

        if let Some(provider) = file.llm.provider {
            result.llm_provider = provider;
        }
        if file.llm.model.is_some() {
            result.llm_model = file.llm.model;
        }
        if let Some(temperature) = file.llm.temperature {
            result.temperature = temperature;
        }
        if file.llm.endpoint.is_some() {
            result.ollama_url = file.llm.endpoint;
        }

        if let Some(provider) = file.embeddings.provider {
            result.embedding_provider = provider;
        }
        if file.embeddings.model.is_some() {
            result.embedding_model = file.embeddings.model;
        }

        if let Some(dir) = file.store.dir {
            result.store_dir = dir;
        }
        if let Some(collection) = file.store.collection {
            result.collection = collection;
        }
        if let Some(top_k) = file.store.top_k {
            result.top_k = top_k;
        }

        if file.prompts.dir.is_some() {
            result.prompts_dir = file.prompts.dir;
        }

        if let Some(host) = file.server.host {
            result.host = host;
        }
        if let Some(port) = file.server.port {
            result.port = port;
        }

        if file.logging.level.is_some() {
            result.log_level = file.logging.level;
        }
        if let Some(color) = file.logging.color {
            result.no_color = !color;
        }
        if let Some(json) = file.logging.json {
            result.log_json = json;
        }

        Ok(result)
    }

    /// Apply environment overrides through a lookup function.
    ///
    /// Empty values are treated as unset.
    pub fn apply_env<F>(mut self, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(provider) = get("LLM_PROVIDER") {
            self.llm_provider = provider;
        }
        if let Some(model) = get("LLM_MODEL") {
            self.llm_model = Some(model);
        }
        if let Some(raw) = get("LLM_TEMPERATURE") {
            self.temperature = raw.trim().parse().map_err(|_| {
                AppError::Config(format!("LLM_TEMPERATURE is not a number: {}", raw))
            })?;
        }
        if let Some(endpoint) = get("OLLAMA_URL") {
            self.ollama_url = Some(endpoint);
        }

        if let Some(provider) = get("EMBEDDING_MODEL") {
            self.embedding_provider = provider;
        }
        if let Some(model) = get("EMBEDDING_MODEL_NAME") {
            self.embedding_model = Some(model);
        }

        if let Some(key) = get("OPENAI_API_KEY") {
            self.openai_api_key = Some(key);
        }
        if let Some(key) = get("GOOGLE_API_KEY") {
            self.google_api_key = Some(key);
        }

        if let Some(dir) = get("DOCSTORE_DIR") {
            self.store_dir = PathBuf::from(dir);
        }
        if let Some(collection) = get("DOCSTORE_COLLECTION") {
            self.collection = collection;
        }
        if let Some(dir) = get("RAGLINE_PROMPTS_DIR") {
            self.prompts_dir = Some(PathBuf::from(dir));
        }

        if let Some(host) = get("RAGLINE_HOST") {
            self.host = host;
        }
        if let Some(raw) = get("RAGLINE_PORT") {
            self.port = raw
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("RAGLINE_PORT is not a port: {}", raw)))?;
        }

        if let Some(level) = get("RUST_LOG") {
            self.log_level = Some(level);
        }
        if lookup("NO_COLOR").is_some() {
            self.no_color = true;
        }

        Ok(self)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over the environment and the config file.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
        log_json: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.llm_provider = provider;
        }

        if let Some(model) = model {
            self.llm_model = Some(model);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        if log_json {
            self.log_json = true;
        }

        self
    }

    /// Resolve which language model backend to bind.
    ///
    /// OpenAI is used when requested and its key is present; otherwise a
    /// Google key selects Gemini. Ollama needs no key and is only used when
    /// requested explicitly.
    pub fn resolve_llm(&self) -> AppResult<LlmSettings> {
        let requested = LlmBackend::parse(&self.llm_provider).ok_or_else(|| {
            AppError::Config(format!(
                "Unknown LLM provider: {}. Supported: openai, gemini, ollama",
                self.llm_provider
            ))
        })?;

        let backend = match requested {
            LlmBackend::Ollama => LlmBackend::Ollama,
            LlmBackend::OpenAI if self.openai_api_key.is_some() => LlmBackend::OpenAI,
            _ if self.google_api_key.is_some() => LlmBackend::Gemini,
            _ => {
                return Err(AppError::Config(
                    "No LLM provider configured. Set OPENAI_API_KEY or GOOGLE_API_KEY."
                        .to_string(),
                ))
            }
        };

        if backend != requested {
            tracing::warn!(
                "LLM provider '{}' unavailable, falling back to '{}'",
                requested.as_str(),
                backend.as_str()
            );
        }

        // A model override only applies to the backend it was set for
        let model = match self.llm_model.clone() {
            Some(model) if backend == requested => model,
            _ => backend.default_model().to_string(),
        };

        // The configured URL belongs to Ollama; hosted backends keep their public endpoint
        let endpoint = match backend {
            LlmBackend::Ollama => Some(
                self.ollama_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_OLLAMA_ENDPOINT.to_string()),
            ),
            LlmBackend::OpenAI | LlmBackend::Gemini => None,
        };

        let api_key = match backend {
            LlmBackend::OpenAI => self.openai_api_key.clone(),
            LlmBackend::Gemini => self.google_api_key.clone(),
            LlmBackend::Ollama => None,
        };

        Ok(LlmSettings {
            backend,
            model,
            temperature: self.temperature,
            api_key,
            endpoint,
        })
    }

    /// Resolve which embedding backend the document store uses.
    pub fn resolve_embeddings(&self) -> AppResult<EmbeddingSettings> {
        let backend = EmbeddingBackend::from_setting(&self.embedding_provider);

        let api_key = match backend {
            EmbeddingBackend::OpenAI => Some(self.openai_api_key.clone().ok_or_else(|| {
                AppError::Config("OpenAI embeddings require OPENAI_API_KEY".to_string())
            })?),
            EmbeddingBackend::Gemini => Some(self.google_api_key.clone().ok_or_else(|| {
                AppError::Config("Gemini embeddings require GOOGLE_API_KEY".to_string())
            })?),
            EmbeddingBackend::Trigram => None,
        };

        let model = self
            .embedding_model
            .clone()
            .unwrap_or_else(|| backend.default_model().to_string());

        Ok(EmbeddingSettings {
            backend,
            model,
            api_key,
        })
    }

    /// Validate configuration before the service starts.
    pub fn validate(&self) -> AppResult<()> {
        if self.top_k == 0 {
            return Err(AppError::Config("top_k must be at least 1".to_string()));
        }

        if self.collection.trim().is_empty() {
            return Err(AppError::Config(
                "Collection name cannot be empty".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(AppError::Config(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }

        self.resolve_llm()?;
        self.resolve_embeddings()?;

        Ok(())
    }
}
