use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// What the conversation controller asks the client to run:
/// one prompt against one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceRequest {
    pub model: String,
    pub prompt: String,
}

/// How a dispatched request settled. Exactly one of these is delivered
/// per request; failure detail is dropped on purpose, the conversation
/// shows a fixed fallback line regardless of cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    Completed { text: String },
    Failed,
}

/// JSON body for the Ollama generate endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

/// The slice of the generate response this client cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
}

/// Client for a local Ollama-style inference endpoint
#[derive(Clone)]
pub struct OllamaClient {
    endpoint: String,
    client: reqwest::Client,
}

impl OllamaClient {
    /// The client carries no timeout: an in-flight request always runs to
    /// completion or transport failure, and is never aborted.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Run one non-streaming generate call and return the response text.
    pub async fn generate(&self, request: &InferenceRequest) -> Result<String> {
        let payload = GenerateRequest {
            model: request.model.clone(),
            prompt: request.prompt.clone(),
            stream: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("inference endpoint returned {}", response.status()));
        }

        let body: GenerateResponse = response.json().await?;
        Ok(body.response)
    }

    /// Fire the request on a background task and report the outcome over
    /// the channel. The UI loop drains the channel; it never blocks here.
    pub fn dispatch(
        &self,
        request: InferenceRequest,
        tx: mpsc::UnboundedSender<CompletionOutcome>,
    ) {
        let client = self.clone();
        tokio::spawn(async move {
            let outcome = match client.generate(&request).await {
                Ok(text) => CompletionOutcome::Completed { text },
                Err(_) => CompletionOutcome::Failed,
            };
            let _ = tx.send(outcome);
        });
    }
}
