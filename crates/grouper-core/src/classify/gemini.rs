use serde::{Deserialize, Serialize};
use tracing::debug;

use super::service::{check_status, http_client, TextService};
use crate::error::ServiceError;

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
// Kept out of the query string so the key never shows up in a logged URL.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Gemini `generateContent` backend.
pub struct GeminiService {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiService {
    pub fn new(api_key: &str, model: &str) -> Result<Self, ServiceError> {
        Ok(Self {
            client: http_client()?,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }
}

impl TextService for GeminiService {
    fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!("POST {} (model {})", url, self.model);
        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()?;
        let body: GenerateResponse = check_status(response)?.json()?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ServiceError::EmptyResponse);
        }
        Ok(text)
    }
}
