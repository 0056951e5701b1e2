use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{GenerationOptions, OllamaConfig};
use crate::describe::types::{GeneratorInfo, TextGenerator};
use crate::describe::DescribeError;

/// Timeout for the reachability probe; a healthy daemon answers instantly.
const PROBE_TIMEOUT_SECS: u64 = 2;

/// HTTP client for a local Ollama instance.
pub struct OllamaGenerator {
    base_url: String,
    model: String,
    options: GenerationOptions,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl OllamaGenerator {
    pub fn new(config: &OllamaConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            options: config.options.clone(),
            timeout_secs: config.timeout_secs,
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, e: reqwest::Error) -> DescribeError {
        if e.is_connect() {
            DescribeError::GeneratorConnection(self.base_url.clone())
        } else if e.is_timeout() {
            DescribeError::GeneratorTimeout(self.timeout_secs)
        } else {
            DescribeError::HttpClient(e.to_string())
        }
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: &'a GenerationOptions,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, DescribeError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            system,
            stream: false,
            options: &self.options,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DescribeError::GeneratorHttp {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| DescribeError::HttpClient(e.to_string()))?;

        Ok(parsed.response)
    }

    async fn is_reachable(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(PROBE_TIMEOUT_SECS))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn info(&self) -> GeneratorInfo {
        GeneratorInfo {
            backend: "ollama",
            model: self.model.clone(),
            base_url: Some(self.base_url.clone()),
        }
    }
}

/// Mock generator for tests. Returns a configurable response and counts
/// how often it was invoked.
pub struct MockGenerator {
    response: String,
    reachable: bool,
    calls: AtomicUsize,
}

impl MockGenerator {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            reachable: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unreachable(mut self) -> Self {
        self.reachable = false;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, DescribeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.reachable {
            return Err(DescribeError::GeneratorConnection("mock".into()));
        }
        Ok(self.response.clone())
    }

    async fn is_reachable(&self) -> bool {
        self.reachable
    }

    fn info(&self) -> GeneratorInfo {
        GeneratorInfo {
            backend: "mock",
            model: "mock".to_string(),
            base_url: None,
        }
    }
}
