//! Adventure planner: one prompt in, one structured itinerary out.
//!
//! The controller is generic over how bytes travel (`Transport`) and where
//! the outcome lands (`PlannerView`); the browser supplies `fetch` and DOM
//! implementations, tests supply in-memory ones.

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::PlannerConfig;
use crate::error::PlannerError;

pub const EMPTY_PROMPT_MESSAGE: &str = "Please describe the adventure you want.";
pub const LOADING_MESSAGE: &str = "Planning your adventure...";
pub const FAILURE_MESSAGE: &str = "Sorry, something went wrong. Please try again.";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdventureResult {
    pub title: String,
    pub description: String,
    pub locations: Vec<String>,
    pub activities: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Content {
    pub role: &'static str,
    pub parts: Vec<Part>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: &'static str,
    pub response_schema: serde_json::Value,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateRequest {
    pub fn for_prompt(prompt: &str) -> Self {
        let text = format!(
            "Plan an adventure for this request: \"{}\". Give it a short title, a one \
             paragraph description, a list of locations to visit and a list of activities.",
            prompt
        );
        Self {
            contents: vec![Content { role: "user", parts: vec![Part { text }] }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: adventure_schema(),
            },
        }
    }
}

fn adventure_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "description": { "type": "STRING" },
            "locations": { "type": "ARRAY", "items": { "type": "STRING" } },
            "activities": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["title", "description", "locations", "activities"]
    })
}

#[derive(Deserialize)]
struct Envelope {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<Part>,
}

/// Unwrap `candidates[0].content.parts[0].text` and parse it as a result.
pub fn parse_reply(body: &str) -> Result<AdventureResult, PlannerError> {
    let envelope: Envelope = serde_json::from_str(body)?;
    let text = envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text)
        .ok_or_else(|| PlannerError::Payload("reply has no candidate text".into()))?;
    Ok(serde_json::from_str(&text)?)
}

pub fn validate_prompt(raw: &str) -> Result<&str, PlannerError> {
    let prompt = raw.trim();
    if prompt.is_empty() {
        Err(PlannerError::EmptyPrompt)
    } else {
        Ok(prompt)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Transport {
    /// POST a JSON body; resolves once the whole response body is read.
    fn post(&self, url: &str, body: String) -> impl Future<Output = Result<HttpReply, PlannerError>>;
}

impl<T: Transport> Transport for &T {
    fn post(&self, url: &str, body: String) -> impl Future<Output = Result<HttpReply, PlannerError>> {
        (**self).post(url, body)
    }
}

pub trait PlannerView {
    /// Disable or re-enable the submit control.
    fn set_busy(&self, busy: bool);
    fn show_message(&self, message: &str);
    fn show_result(&self, result: &AdventureResult);
}

pub struct Planner<T> {
    config: PlannerConfig,
    transport: T,
}

impl<T: Transport> Planner<T> {
    pub fn new(config: PlannerConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Run one round trip and reflect every outcome on `view`.
    ///
    /// An empty prompt never reaches the transport. Whatever happens after
    /// that, the submit control ends up enabled again.
    pub async fn submit<V: PlannerView>(&self, raw: &str, view: &V) -> Result<AdventureResult, PlannerError> {
        let prompt = match validate_prompt(raw) {
            Ok(p) => p,
            Err(e) => {
                view.show_message(EMPTY_PROMPT_MESSAGE);
                return Err(e);
            }
        };

        view.set_busy(true);
        view.show_message(LOADING_MESSAGE);

        let outcome = self.request(prompt).await;
        match &outcome {
            Ok(result) => {
                log::info!("adventure planned: {}", result.title);
                view.show_result(result);
            }
            Err(e) => {
                log::error!("adventure planner failed: {}", e);
                view.show_message(FAILURE_MESSAGE);
            }
        }

        view.set_busy(false);
        outcome
    }

    async fn request(&self, prompt: &str) -> Result<AdventureResult, PlannerError> {
        let body = serde_json::to_string(&GenerateRequest::for_prompt(prompt))?;
        let reply = self.transport.post(self.config.request_url(), body).await?;
        if !reply.is_success() {
            return Err(PlannerError::Status(reply.status));
        }
        parse_reply(&reply.body)
    }
}
