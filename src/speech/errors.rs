//! Error types surfaced by message brokers.
use std::fmt;

use super::broker::ProviderKind;

/// Failure categories for a remote message fetch. Every one of them is
/// recovered by a fallback string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechErrorKind {
    MissingCredential,
    Transport { message: String },
    Timeout,
    HttpStatus { status: u16, body: String },
    MalformedResponse { message: String },
    EmptyCompletion,
}

impl SpeechErrorKind {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Short tag used in the history log.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::Transport { .. } => "transport",
            Self::Timeout => "timeout",
            Self::HttpStatus { .. } => "http_status",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::EmptyCompletion => "empty_completion",
        }
    }
}

impl fmt::Display for SpeechErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential => write!(f, "No API key configured"),
            Self::Transport { message } => write!(f, "Transport failure: {}", message),
            Self::Timeout => write!(f, "Request timed out"),
            Self::HttpStatus { status, body } => write!(f, "HTTP {}: {}", status, body),
            Self::MalformedResponse { message } => write!(f, "Malformed response: {}", message),
            Self::EmptyCompletion => write!(f, "Provider returned no text"),
        }
    }
}

/// Full error with the provider that raised it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechError {
    pub provider: ProviderKind,
    pub kind: SpeechErrorKind,
}

impl SpeechError {
    pub fn new(provider: ProviderKind, kind: SpeechErrorKind) -> Self {
        Self { provider, kind }
    }
}

impl fmt::Display for SpeechError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Speech error ({}): {}", self.provider, self.kind)
    }
}

impl std::error::Error for SpeechError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_provider_and_detail() {
        let error = SpeechError::new(
            ProviderKind::Gemini,
            SpeechErrorKind::http_status(429, "quota exhausted"),
        );
        let rendered = error.to_string();
        assert!(rendered.contains("gemini"));
        assert!(rendered.contains("429"));
        assert_eq!(error.kind.tag(), "http_status");
    }

    #[test]
    fn constructors_build_expected_variants() {
        assert!(matches!(
            SpeechErrorKind::transport("dns"),
            SpeechErrorKind::Transport { .. }
        ));
        assert!(matches!(
            SpeechErrorKind::malformed("no candidates"),
            SpeechErrorKind::MalformedResponse { .. }
        ));
    }
}
