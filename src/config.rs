use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

use crate::describe::types::Mode;

/// Application-level constants
pub const SERVICE_NAME: &str = "docsmith";
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    format!("info,{SERVICE_NAME}=debug")
}

/// Which collaborator serves model-backed requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Ollama HTTP generation API.
    Ollama,
    /// In-process ONNX seq2seq model (requires the `onnx-generator` feature).
    Local { model_dir: PathBuf },
}

/// Sampling options forwarded verbatim to the generation API.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub repeat_penalty: f32,
    pub num_ctx: u32,
    pub num_predict: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            top_p: 0.9,
            top_k: 60,
            repeat_penalty: 1.15,
            num_ctx: 4096,
            num_predict: 256,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub options: GenerationOptions,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.1:8b-instruct-q4_K_M".to_string(),
            timeout_secs: 90,
            options: GenerationOptions::default(),
        }
    }
}

/// Full service configuration, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Mode used when a request does not pass `?mode=`.
    pub default_mode: Mode,
    pub backend: Backend,
    pub ollama: OllamaConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::from([127, 0, 0, 1]),
            port: 8000,
            default_mode: Mode::Model,
            backend: Backend::Ollama,
            ollama: OllamaConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Read configuration from environment variables, falling back to
    /// defaults on missing or unparseable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let ollama_defaults = OllamaConfig::default();
        let option_defaults = GenerationOptions::default();

        let backend = match std::env::var("GENERATOR_BACKEND").ok().as_deref() {
            Some("local") => Backend::Local {
                model_dir: std::env::var("LOCAL_MODEL_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("models/seq2seq")),
            },
            _ => Backend::Ollama,
        };

        Self {
            bind_addr: env_parsed("BIND_ADDR", defaults.bind_addr),
            port: env_parsed("PORT", defaults.port),
            default_mode: env_parsed("DESCRIBE_MODE", defaults.default_mode),
            backend,
            ollama: OllamaConfig {
                base_url: std::env::var("OLLAMA_BASE_URL")
                    .unwrap_or(ollama_defaults.base_url),
                model: std::env::var("OLLAMA_MODEL").unwrap_or(ollama_defaults.model),
                timeout_secs: env_parsed("OLLAMA_TIMEOUT_SECS", ollama_defaults.timeout_secs),
                options: GenerationOptions {
                    temperature: env_parsed("OLLAMA_TEMPERATURE", option_defaults.temperature),
                    top_p: env_parsed("OLLAMA_TOP_P", option_defaults.top_p),
                    top_k: env_parsed("OLLAMA_TOP_K", option_defaults.top_k),
                    repeat_penalty: env_parsed(
                        "OLLAMA_REPEAT_PENALTY",
                        option_defaults.repeat_penalty,
                    ),
                    num_ctx: env_parsed("OLLAMA_NUM_CTX", option_defaults.num_ctx),
                    num_predict: env_parsed("OLLAMA_NUM_PREDICT", option_defaults.num_predict),
                },
            },
        }
    }
}

fn env_parsed<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
