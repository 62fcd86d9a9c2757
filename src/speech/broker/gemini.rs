use bevy::log::{info, warn};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::super::{
    errors::{SpeechError, SpeechErrorKind},
    types::SpeechRequest,
};
use super::{
    config::{GeminiConfig, GeminiConfigError},
    MessageBroker, ProviderKind,
};

const API_KEY_HEADER: &str = "x-goog-api-key";
const ERROR_BODY_LIMIT: usize = 200;

/// Gemini `generateContent` broker. Without a usable key it stays in fallback
/// mode and every call reports a missing credential.
pub struct GeminiBroker {
    mode: BrokerMode,
}

enum BrokerMode {
    Live(GeminiLiveClient),
    Fallback,
}

impl GeminiBroker {
    pub fn new() -> Self {
        match GeminiConfig::from_env() {
            Ok(config) => Self::with_config(config),
            Err(GeminiConfigError::MissingApiKey) => {
                warn!(
                    target: "speech",
                    "GEMINI_API_KEY not set; Milk Mocha will use offline messages."
                );
                Self::fallback()
            }
            Err(err) => {
                warn!(target: "speech", "Gemini broker unavailable ({}).", err);
                Self::fallback()
            }
        }
    }

    pub fn with_config(config: GeminiConfig) -> Self {
        match GeminiLiveClient::new(config) {
            Ok(client) => {
                info!(
                    target: "speech",
                    "Gemini broker live with models {:?}",
                    client.config.models
                );
                Self {
                    mode: BrokerMode::Live(client),
                }
            }
            Err(err) => {
                warn!(
                    target: "speech",
                    "Gemini broker running in fallback mode ({}). Check HTTP client configuration.",
                    err
                );
                Self::fallback()
            }
        }
    }

    pub fn fallback() -> Self {
        Self {
            mode: BrokerMode::Fallback,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self.mode, BrokerMode::Live(_))
    }
}

impl Default for GeminiBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageBroker for GeminiBroker {
    fn provider_kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn generate(&self, request: &SpeechRequest) -> Result<String, SpeechError> {
        match &self.mode {
            BrokerMode::Live(client) => client
                .send(request)
                .map_err(|kind| SpeechError::new(self.provider_kind(), kind)),
            BrokerMode::Fallback => Err(SpeechError::new(
                self.provider_kind(),
                SpeechErrorKind::MissingCredential,
            )),
        }
    }
}

struct GeminiLiveClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiLiveClient {
    fn new(config: GeminiConfig) -> Result<Self, GeminiConfigError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| GeminiConfigError::ClientBuild(err.to_string()))?;

        Ok(Self { http, config })
    }

    /// Walks the model list and returns the first usable completion, or the
    /// last failure when every model refuses.
    fn send(&self, request: &SpeechRequest) -> Result<String, SpeechErrorKind> {
        let mut last_error = SpeechErrorKind::EmptyCompletion;
        for model in &self.config.models {
            match self.send_to_model(model, request) {
                Ok(text) => return Ok(text),
                Err(kind) => {
                    warn!(
                        target: "speech",
                        "Gemini model {} failed: {}",
                        model,
                        kind
                    );
                    last_error = kind;
                }
            }
        }
        Err(last_error)
    }

    fn send_to_model(&self, model: &str, request: &SpeechRequest) -> Result<String, SpeechErrorKind> {
        let payload = GenerateRequest::from_prompt(&request.prompt);
        let response = self
            .http
            .post(self.config.generate_url(model))
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&payload)
            .send()
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SpeechErrorKind::http_status(
                status.as_u16(),
                truncate(&body, ERROR_BODY_LIMIT),
            ));
        }

        let body = response.text().map_err(classify_transport)?;
        parse_completion(&body)
    }
}

fn classify_transport(err: reqwest::Error) -> SpeechErrorKind {
    if err.is_timeout() {
        SpeechErrorKind::Timeout
    } else {
        SpeechErrorKind::transport(err.to_string())
    }
}

fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Extracts the first candidate's text, flattened onto a single line.
pub(crate) fn parse_completion(body: &str) -> Result<String, SpeechErrorKind> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|err| SpeechErrorKind::malformed(err.to_string()))?;

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| SpeechErrorKind::malformed("response carried no candidates"))?;

    let text = candidate
        .content
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| SpeechErrorKind::malformed("candidate carried no text part"))?;

    let cleaned = text.trim().replace('\n', " ");
    if cleaned.is_empty() {
        return Err(SpeechErrorKind::EmptyCompletion);
    }
    Ok(cleaned)
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

impl<'a> GenerateRequest<'a> {
    fn from_prompt(prompt: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}
