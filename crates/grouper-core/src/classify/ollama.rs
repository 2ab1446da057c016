use serde::{Deserialize, Serialize};
use tracing::debug;

use super::service::{check_status, http_client, TextService};
use crate::error::ServiceError;

const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Local Ollama `/api/generate` backend (non-streaming).
pub struct OllamaService {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

impl OllamaService {
    pub fn new(model: &str) -> Result<Self, ServiceError> {
        Ok(Self {
            client: http_client()?,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }
}

impl TextService for OllamaService {
    fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        let url = format!("{}/api/generate", self.endpoint);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        debug!("POST {} (model {})", url, self.model);
        let response = self.client.post(&url).json(&request).send()?;
        let body: GenerateResponse = check_status(response)?.json()?;

        match body.response {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(ServiceError::EmptyResponse),
        }
    }
}
