//! Dork generation with a local language model.
//!
//! Talks to an Ollama-compatible server (`POST /api/generate`, non-streaming)
//! with a fixed few-shot prompt: three description → dork examples followed
//! by the caller's description. The model output is returned as-is, minus
//! surrounding whitespace; it is not checked for valid dork syntax.

use serde::{Deserialize, Serialize};

use crate::config::GeneratorConfig;
use crate::utils::HttpClient;

/// Default local Ollama endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Small instruction-tuned model that runs on CPU
pub const DEFAULT_MODEL: &str = "orca-mini:3b";

/// Few-shot examples, in prompt order: (description, dork)
pub const EXAMPLES: [(&str, &str); 3] = [
    (
        "PDF documents about computer security published in the last year.",
        "filetype:pdf \"computer security\" after:2023-01-01",
    ),
    (
        "PowerPoint presentations about climate change available on .edu sites.",
        "site:.edu filetype:ppt \"climate change\"",
    ),
    (
        "Email lists in text files on government domains.",
        "site:.gov filetype:txt \"email\" | \"e-mail address\"",
    ),
];

const INSTRUCTIONS: &str = "Generate a specific Google Dork based on the user's description. \
A Google Dork uses advanced search engine operators to find specific information that is hard \
to find with a normal search. Your task is to turn the user's description into a precise Google \
Dork. Here are some examples of how Google Dorks should be written for different descriptions:";

/// Build the few-shot prompt for a description
pub fn build_prompt(description: &str) -> String {
    let mut prompt = String::from(INSTRUCTIONS);
    prompt.push_str("\n\n");

    for (example, dork) in EXAMPLES {
        prompt.push_str(&format!("Description: {}\nGoogle Dork: {}\n\n", example, dork));
    }

    prompt.push_str(
        "Now, based on the following description provided by the user, \
         generate the corresponding Google Dork:\n\n",
    );
    prompt.push_str(&format!("Description: {}\nGoogle Dork:", description.trim()));
    prompt
}

/// Errors that can occur while generating a dork
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("Description must not be empty")]
    EmptyDescription,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Model server error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for GeneratorError {
    fn from(err: reqwest::Error) -> Self {
        GeneratorError::Network(err.to_string())
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Turns natural-language descriptions into dork queries
#[derive(Debug, Clone)]
pub struct DorkGenerator {
    client: HttpClient,
    endpoint: String,
    model: String,
}

impl DorkGenerator {
    pub fn new(client: HttpClient, endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    /// Build a generator with its own client, using the configured timeout
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, GeneratorError> {
        let client = HttpClient::new(config.timeout())?;
        Ok(Self::new(client, &config.endpoint, &config.model))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the model for a dork matching `description`.
    pub async fn generate(&self, description: &str) -> Result<String, GeneratorError> {
        if description.trim().is_empty() {
            return Err(GeneratorError::EmptyDescription);
        }

        let prompt = build_prompt(description);
        let url = format!("{}/api/generate", self.endpoint.trim_end_matches('/'));

        tracing::debug!(model = %self.model, url = %url, "Requesting dork from language model");

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt: &prompt,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| GeneratorError::Network(format!("Failed to reach {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(GeneratorError::Api(format!("status {}: {}", status, detail)));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::Parse(format!("Unexpected model response: {}", e)))?;

        Ok(body.response.trim().to_string())
    }
}
