//! Message source combining prompts, fallbacks and the optional remote broker.
use std::sync::Arc;

use bevy::prelude::*;

use super::{
    activity::TimeOfDay,
    broker::MessageBroker,
    fallback::FallbackTable,
    prompts::{PromptBook, STORY_PROMPT},
    types::{ActivityContext, MessageCategory, SpeechOrigin, SpeechPurpose, SpeechRequest},
};

/// Builds requests and resolves them to text. Without a broker every request
/// resolves to a fallback string.
#[derive(Resource)]
pub struct MessageSource {
    prompts: PromptBook,
    fallback: FallbackTable,
    broker: Option<Arc<dyn MessageBroker>>,
    /// Set from the `use_fallback_only` setting; hides the broker without dropping it.
    offline: bool,
    rng: fastrand::Rng,
}

impl MessageSource {
    pub fn new(fallback: FallbackTable, broker: Option<Arc<dyn MessageBroker>>) -> Self {
        Self::with_rng(fallback, broker, fastrand::Rng::new())
    }

    pub fn with_rng(
        fallback: FallbackTable,
        broker: Option<Arc<dyn MessageBroker>>,
        rng: fastrand::Rng,
    ) -> Self {
        Self {
            prompts: PromptBook::default(),
            fallback,
            broker,
            offline: false,
            rng,
        }
    }

    /// Source that never goes to the network.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn offline(fallback: FallbackTable) -> Self {
        Self::new(fallback, None)
    }

    pub fn broker(&self) -> Option<Arc<dyn MessageBroker>> {
        if self.offline {
            None
        } else {
            self.broker.clone()
        }
    }

    pub fn has_broker(&self) -> bool {
        !self.offline && self.broker.is_some()
    }

    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    /// Request for a category; `None` avoids repeating the previous category.
    pub fn category_request(
        &mut self,
        category: Option<MessageCategory>,
        purpose: SpeechPurpose,
    ) -> SpeechRequest {
        let category = self.prompts.choose_category(category, &mut self.rng);
        let prompt = self.prompts.category_prompt(category, &mut self.rng);
        SpeechRequest::new(category, purpose, prompt)
    }

    pub fn contextual_request(&mut self, activity: ActivityContext) -> SpeechRequest {
        self.category_request(Some(activity.category()), SpeechPurpose::Contextual)
    }

    /// Greetings in the morning, anything otherwise.
    pub fn startup_request(&mut self, time_of_day: TimeOfDay) -> SpeechRequest {
        let category = if time_of_day == TimeOfDay::Morning {
            MessageCategory::Greetings
        } else {
            MessageCategory::Random
        };
        self.category_request(Some(category), SpeechPurpose::Scheduled)
    }

    pub fn custom_request(&mut self, text: &str) -> SpeechRequest {
        SpeechRequest::new(
            MessageCategory::Greetings,
            SpeechPurpose::Custom,
            self.prompts.custom_prompt(text),
        )
    }

    pub fn story_request(&mut self) -> SpeechRequest {
        SpeechRequest::new(MessageCategory::Humorous, SpeechPurpose::Story, STORY_PROMPT)
    }

    pub fn fallback_for(&mut self, request: &SpeechRequest) -> String {
        self.fallback
            .pick_for(request.purpose, request.category, &mut self.rng)
    }

    /// Blocking resolution on the calling thread. Never fails.
    pub fn fetch_blocking(&mut self, request: &SpeechRequest) -> (String, SpeechOrigin) {
        let Some(broker) = self.broker() else {
            return (self.fallback_for(request), SpeechOrigin::Fallback);
        };
        match broker.generate(request) {
            Ok(text) => (text, SpeechOrigin::Live),
            Err(err) => {
                warn!(target: "speech", "{}; using fallback", err);
                (self.fallback_for(request), SpeechOrigin::Fallback)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::{
        broker::ProviderKind,
        errors::{SpeechError, SpeechErrorKind},
        prompts::PERSONA,
    };

    struct FixedBroker(Result<String, SpeechErrorKind>);

    impl MessageBroker for FixedBroker {
        fn provider_kind(&self) -> ProviderKind {
            ProviderKind::Gemini
        }

        fn generate(&self, _request: &SpeechRequest) -> Result<String, SpeechError> {
            self.0
                .clone()
                .map_err(|kind| SpeechError::new(ProviderKind::Gemini, kind))
        }
    }

    fn source_with(broker: Option<FixedBroker>) -> MessageSource {
        MessageSource::with_rng(
            FallbackTable::builtin(),
            broker.map(|broker| Arc::new(broker) as Arc<dyn MessageBroker>),
            fastrand::Rng::with_seed(9),
        )
    }

    #[test]
    fn live_reply_is_returned_verbatim() {
        let mut source = source_with(Some(FixedBroker(Ok("Hi friend! 🥛".into()))));
        let request = source.category_request(None, SpeechPurpose::Scheduled);
        assert_eq!(
            source.fetch_blocking(&request),
            ("Hi friend! 🥛".to_string(), SpeechOrigin::Live)
        );
    }

    #[test]
    fn failures_and_missing_broker_fall_back() {
        let mut failing = source_with(Some(FixedBroker(Err(SpeechErrorKind::Timeout))));
        let request = failing.category_request(Some(MessageCategory::Wellness), SpeechPurpose::Scheduled);
        let (text, origin) = failing.fetch_blocking(&request);
        assert_eq!(origin, SpeechOrigin::Fallback);
        assert!(!text.is_empty());

        let mut offline = source_with(None);
        assert!(!offline.has_broker());
        let (text, origin) = offline.fetch_blocking(&request);
        assert_eq!(origin, SpeechOrigin::Fallback);
        assert!(!text.is_empty());

        let mut muted = source_with(Some(FixedBroker(Ok("live".into()))));
        muted.set_offline(true);
        assert!(!muted.has_broker());
        assert_eq!(muted.fetch_blocking(&request).1, SpeechOrigin::Fallback);
        muted.set_offline(false);
        assert_eq!(muted.fetch_blocking(&request).1, SpeechOrigin::Live);
    }

    #[test]
    fn request_builders_set_purpose_and_category() {
        let mut source = source_with(None);
        let custom = source.custom_request("Say hello in a cute way");
        assert_eq!(custom.purpose, SpeechPurpose::Custom);
        assert_eq!(custom.category, MessageCategory::Greetings);
        assert!(custom.prompt.starts_with(PERSONA));

        let morning = source.startup_request(TimeOfDay::Morning);
        assert_eq!(morning.category, MessageCategory::Greetings);
        let evening = source.startup_request(TimeOfDay::Evening);
        assert_eq!(evening.category, MessageCategory::Random);

        let working = source.contextual_request(ActivityContext::Working);
        assert_eq!(working.category, MessageCategory::Motivational);
        assert_eq!(working.purpose, SpeechPurpose::Contextual);

        let story = source.story_request();
        assert_eq!(story.purpose, SpeechPurpose::Story);
        assert!(source.fallback_for(&story).starts_with("📚"));
    }
}
