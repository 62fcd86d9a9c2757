//! Systems wiring the speech pipeline into the frame loop.
use std::time::Duration;

use bevy::prelude::*;

use crate::core::PetClock;
use crate::pet::{AnimationKey, PetCoordinator, PetInput};
use crate::settings::PetSettings;

use super::{
    activity::{contextual_activity, system_idle_time, TimeOfDay},
    dispatcher::{DispatchOutcome, SpeechDispatcher},
    events::{BubbleCommand, SpeechCommand, SpeechDelivered, TEST_BUBBLE_TEXT},
    prompts::CUSTOM_GREETING_PROMPT,
    schedule::SpeakingSchedule,
    source::MessageSource,
    types::SpeechPurpose,
};

const STORY_LAUGH_HOLD: Duration = Duration::from_secs(5);

/// Desktop-wide idle time when the platform reports it, otherwise time since
/// the last interaction with the pet.
fn user_idle(coordinator: Option<&PetCoordinator>) -> Duration {
    system_idle_time()
        .or_else(|| coordinator.map(PetCoordinator::idle_for))
        .unwrap_or_default()
}

pub fn run_speaking_schedule(
    clock: Res<PetClock>,
    settings: Res<PetSettings>,
    coordinator: Option<Res<PetCoordinator>>,
    mut schedule: ResMut<SpeakingSchedule>,
    mut commands: MessageWriter<SpeechCommand>,
) {
    let due = schedule.tick(clock.delta());

    if due.greeting {
        if settings.speaking_enabled {
            commands.write(SpeechCommand::Greeting);
        } else {
            debug!(target: "speech", "Speaking disabled; skipping startup greeting");
        }
    }

    if due.check {
        let idle = user_idle(coordinator.as_deref());
        if schedule.is_opportunity(
            clock.elapsed(),
            settings.speaking_enabled,
            settings.speaking_interval(),
            idle,
        ) {
            commands.write(SpeechCommand::Scheduled);
        } else {
            debug!(target: "speech", "Not a good time to speak (idle {:?})", idle);
        }
    }
}

/// Mirrors `use_fallback_only` onto the message source.
pub fn sync_fallback_only(settings: Res<PetSettings>, mut source: ResMut<MessageSource>) {
    if settings.is_changed() && source.is_offline() != settings.use_fallback_only {
        source.set_offline(settings.use_fallback_only);
        info!(
            target: "speech",
            "Remote messages {}",
            if settings.use_fallback_only { "disabled" } else { "enabled" }
        );
    }
}

pub fn handle_speech_commands(
    mut commands: MessageReader<SpeechCommand>,
    coordinator: Option<Res<PetCoordinator>>,
    mut source: ResMut<MessageSource>,
    mut dispatcher: ResMut<SpeechDispatcher>,
    mut bubbles: MessageWriter<BubbleCommand>,
    mut delivered: MessageWriter<SpeechDelivered>,
    mut pet: MessageWriter<PetInput>,
) {
    for command in commands.read() {
        // A timed message must not cancel a fetch the user asked for.
        if *command == SpeechCommand::Scheduled && dispatcher.is_waiting() {
            debug!(target: "speech", "Fetch in flight; skipping scheduled message");
            continue;
        }
        let request = match command {
            SpeechCommand::TestBubble => {
                bubbles.write(BubbleCommand::Show(TEST_BUBBLE_TEXT.to_string()));
                continue;
            }
            SpeechCommand::Fallback => {
                let request = source.category_request(None, SpeechPurpose::Scheduled);
                let delivery = dispatcher.resolve_offline(request, &mut source);
                delivered.write(SpeechDelivered { delivery });
                continue;
            }
            SpeechCommand::Greeting => source.startup_request(TimeOfDay::now()),
            SpeechCommand::Scheduled | SpeechCommand::Contextual => {
                let idle = user_idle(coordinator.as_deref());
                let activity = contextual_activity(idle, TimeOfDay::now());
                debug!(target: "speech", "Activity context {:?} after {:?} idle", activity, idle);
                source.contextual_request(activity)
            }
            SpeechCommand::Custom(text) => source.custom_request(text),
            SpeechCommand::Story => {
                pet.write(PetInput::Command(AnimationKey::Watching));
                source.story_request()
            }
        };

        match dispatcher.dispatch(request, &mut source) {
            DispatchOutcome::Pending(id) => {
                debug!(target: "speech", "Waiting on fetch {}", id.value());
                if let Some(text) = command.interim_text() {
                    bubbles.write(BubbleCommand::Show(text.to_string()));
                }
            }
            DispatchOutcome::Resolved(delivery) => {
                delivered.write(SpeechDelivered { delivery });
            }
        }
    }
}

pub fn poll_speech_dispatcher(
    time: Res<Time<Real>>,
    mut source: ResMut<MessageSource>,
    mut dispatcher: ResMut<SpeechDispatcher>,
    mut delivered: MessageWriter<SpeechDelivered>,
) {
    if let Some(delivery) = dispatcher.poll(time.delta(), &mut source) {
        delivered.write(SpeechDelivered { delivery });
    }
}

pub fn present_deliveries(
    clock: Res<PetClock>,
    mut delivered: MessageReader<SpeechDelivered>,
    mut schedule: ResMut<SpeakingSchedule>,
    mut bubbles: MessageWriter<BubbleCommand>,
    mut pet: MessageWriter<PetInput>,
) {
    for message in delivered.read() {
        let delivery = &message.delivery;
        info!(
            target: "speech",
            "Milk Mocha says ({}, {}): {}",
            delivery.category,
            delivery.origin.label(),
            delivery.text
        );
        bubbles.write(BubbleCommand::Show(delivery.text.clone()));
        schedule.mark_spoken(clock.elapsed());

        if delivery.purpose == SpeechPurpose::Story {
            pet.write(PetInput::Perform {
                key: AnimationKey::Laugh,
                hold: Some(STORY_LAUGH_HOLD),
            });
        }
    }
}

/// Key binding helper: the B key's canned custom prompt.
pub fn custom_greeting() -> SpeechCommand {
    SpeechCommand::Custom(CUSTOM_GREETING_PROMPT.to_string())
}
