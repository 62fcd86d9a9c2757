//! Speech plugin wiring the message source, dispatcher, schedule and history.
use std::sync::Arc;

use bevy::prelude::*;

use crate::settings::PetSettings;

use super::{
    broker::{GeminiBroker, MessageBroker},
    config::SpeechRules,
    dispatcher::SpeechDispatcher,
    events::{BubbleCommand, SpeechCommand, SpeechDelivered},
    fallback::FallbackTable,
    history::{flush_speech_history_log, record_speech_history, SpeechHistory, SpeechHistoryLog},
    schedule::SpeakingSchedule,
    source::MessageSource,
    systems::{
        handle_speech_commands, poll_speech_dispatcher, present_deliveries, run_speaking_schedule,
        sync_fallback_only,
    },
};

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpeechUpdateSet;

pub struct SpeechPlugin {
    rules: SpeechRules,
}

impl SpeechPlugin {
    pub fn new(rules: SpeechRules) -> Self {
        Self { rules }
    }
}

impl Default for SpeechPlugin {
    fn default() -> Self {
        Self::new(SpeechRules::default())
    }
}

impl Plugin for SpeechPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<PetSettings>() {
            app.insert_resource(PetSettings::default());
        }
        let fallback_only = app.world().resource::<PetSettings>().use_fallback_only;

        let gemini = GeminiBroker::new();
        let broker: Option<Arc<dyn MessageBroker>> = if gemini.is_live() {
            Some(Arc::new(gemini))
        } else {
            None
        };
        let mut source = MessageSource::new(FallbackTable::load_or_builtin(), broker);
        source.set_offline(fallback_only);

        info!(
            target: "speech",
            "SpeechPlugin initialised (remote: {}, fallback only: {})",
            source.has_broker(),
            fallback_only
        );

        app.insert_resource(self.rules.clone())
            .insert_resource(source)
            .insert_resource(SpeechDispatcher::new(self.rules.fetch_ceiling))
            .insert_resource(SpeakingSchedule::new(&self.rules))
            .insert_resource(SpeechHistory::new(self.rules.history_capacity))
            .insert_resource(SpeechHistoryLog::new(self.rules.history_path.clone()))
            .add_message::<SpeechCommand>()
            .add_message::<SpeechDelivered>()
            .add_message::<BubbleCommand>()
            .add_systems(
                Update,
                (
                    sync_fallback_only,
                    run_speaking_schedule,
                    handle_speech_commands,
                    poll_speech_dispatcher,
                    present_deliveries,
                    record_speech_history,
                    flush_speech_history_log,
                )
                    .chain()
                    .in_set(SpeechUpdateSet),
            );
    }
}
