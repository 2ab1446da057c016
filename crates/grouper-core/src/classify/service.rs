use std::time::Duration;

use crate::config::{AppConfig, BackendKind};
use crate::error::ServiceError;

use super::gemini::GeminiService;
use super::ollama::OllamaService;

/// Text-in, text-out capability behind the classification client.
///
/// Any backend that answers a prompt with text is substitutable; closures
/// implement it too, which is what tests use for deterministic stubs.
pub trait TextService: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String, ServiceError>;
}

impl<F> TextService for F
where
    F: Fn(&str) -> Result<String, ServiceError> + Send + Sync,
{
    fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        self(prompt)
    }
}

/// Build the backend named in the configuration.
pub fn service_from_config(config: &AppConfig) -> Result<Box<dyn TextService>, ServiceError> {
    match config.backend {
        BackendKind::Gemini => {
            if config.api_key.is_empty() {
                return Err(ServiceError::Config(
                    "the gemini backend needs an api key (set GROUPER_API_KEY)".to_string(),
                ));
            }
            let mut service = GeminiService::new(&config.api_key, &config.model)?;
            if let Some(endpoint) = &config.endpoint {
                service = service.with_endpoint(endpoint);
            }
            Ok(Box::new(service))
        }
        BackendKind::Ollama => {
            let mut service = OllamaService::new(&config.model)?;
            if let Some(endpoint) = &config.endpoint {
                service = service.with_endpoint(endpoint);
            }
            Ok(Box::new(service))
        }
    }
}

/// Shared blocking HTTP client. Classification calls have no timeout.
pub(super) fn http_client() -> Result<reqwest::blocking::Client, ServiceError> {
    Ok(reqwest::blocking::Client::builder().timeout(None::<Duration>).build()?)
}

/// Turn a non-success response into a `ServiceError::Status`.
pub(super) fn check_status(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(ServiceError::Status {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_requires_api_key() {
        let config = AppConfig::default();
        assert!(matches!(
            service_from_config(&config),
            Err(ServiceError::Config(_))
        ));
    }

    #[test]
    fn test_closure_is_a_service() {
        let service = |prompt: &str| Ok::<_, ServiceError>(prompt.to_uppercase());
        assert_eq!(service.complete("abc").unwrap(), "ABC");
    }
}
