//! Message broker trait and the Gemini-backed implementation.

pub mod config;
pub mod gemini;

pub use gemini::GeminiBroker;

use std::fmt;

use super::{errors::SpeechError, types::SpeechRequest};

/// Remote providers we can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Gemini,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Gemini => "gemini",
        };
        write!(f, "{}", label)
    }
}

/// Contract every remote message backend must satisfy. Calls block, so they
/// only ever run on worker threads.
pub trait MessageBroker: Send + Sync {
    fn provider_kind(&self) -> ProviderKind;

    fn generate(&self, request: &SpeechRequest) -> Result<String, SpeechError>;
}
