//! The pet's behaviour state machine.
//!
//! One owned resource holds the active animation, the pending revert, the
//! lockout, the click counter and the window position. Input systems and
//! cadence timers call into it; anything the rest of the app has to react to
//! is queued as a [`PetSignal`] and drained once per frame.
use std::time::Duration;

use bevy::prelude::*;

use super::{
    animation::{AnimationKey, CLICK_REACTIONS, IDLE_ACTIONS},
    config::BehaviorRules,
    lockout::{Lockout, LockoutKind},
    movement::{RunTween, ScreenBounds},
};

/// Observable side effects of coordinator operations.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetSignal {
    AnimationChanged(AnimationKey),
    PersistPosition(IVec2),
    LockoutStarted(LockoutKind),
    LockoutEnded(LockoutKind),
}

/// How an interaction was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// Swallowed by the angry lockout.
    Ignored,
    /// Disturbed the pet while drinking; it is now angry.
    Provoked,
    /// Click threshold reached; the counter was reset.
    Annoyed,
    Played(AnimationKey),
    Moved(IVec2),
}

impl Reaction {
    pub fn was_accepted(self) -> bool {
        matches!(self, Self::Annoyed | Self::Played(_) | Self::Moved(_))
    }
}

#[derive(Debug, Clone)]
struct PendingRevert {
    timer: Timer,
    revert_to: AnimationKey,
}

#[derive(Resource, Debug)]
pub struct PetCoordinator {
    rules: BehaviorRules,
    animation: AnimationKey,
    revert: Option<PendingRevert>,
    lockout: Lockout,
    click_count: u32,
    now: Duration,
    last_interaction: Duration,
    position: IVec2,
    bounds: ScreenBounds,
    /// False until a real monitor has been measured; positions are left
    /// unclamped until then.
    screen_known: bool,
    run: Option<RunTween>,
    rng: fastrand::Rng,
    outbox: Vec<PetSignal>,
}

impl PetCoordinator {
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn new(rules: BehaviorRules, bounds: ScreenBounds, position: IVec2) -> Self {
        Self::with_rng(rules, bounds, position, fastrand::Rng::new())
    }

    pub fn with_rng(
        rules: BehaviorRules,
        bounds: ScreenBounds,
        position: IVec2,
        rng: fastrand::Rng,
    ) -> Self {
        Self {
            rules,
            animation: AnimationKey::Idle,
            revert: None,
            lockout: Lockout::None,
            click_count: 0,
            now: Duration::ZERO,
            last_interaction: Duration::ZERO,
            position: bounds.clamp(position),
            bounds,
            screen_known: true,
            run: None,
            rng,
            outbox: Vec::new(),
        }
    }

    /// Starts at a saved `position` before any monitor is known. The first
    /// `set_bounds` call clamps it.
    pub fn awaiting_screen(rules: BehaviorRules, window: UVec2, position: IVec2) -> Self {
        let bounds = ScreenBounds::new(window, window);
        let mut coordinator = Self::with_rng(rules, bounds, position, fastrand::Rng::new());
        coordinator.position = position;
        coordinator.screen_known = false;
        coordinator
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn animation(&self) -> AnimationKey {
        self.animation
    }

    pub fn lockout(&self) -> Option<LockoutKind> {
        self.lockout.kind()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn lockout_remaining(&self) -> Duration {
        self.lockout.remaining()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn click_count(&self) -> u32 {
        self.click_count
    }

    pub fn position(&self) -> IVec2 {
        self.position
    }

    pub fn bounds(&self) -> ScreenBounds {
        self.bounds
    }

    pub fn is_screen_known(&self) -> bool {
        self.screen_known
    }

    pub fn rules(&self) -> &BehaviorRules {
        &self.rules
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn has_pending_revert(&self) -> bool {
        self.revert.is_some()
    }

    /// Time since the last user interaction.
    pub fn idle_for(&self) -> Duration {
        self.now.saturating_sub(self.last_interaction)
    }

    /// Screen size changed (monitor detected or resized). Re-clamps the position.
    pub fn set_bounds(&mut self, bounds: ScreenBounds) {
        self.bounds = bounds;
        self.screen_known = true;
        let clamped = bounds.clamp(self.position);
        if clamped != self.position {
            self.position = clamped;
            self.outbox.push(PetSignal::PersistPosition(clamped));
        }
    }

    pub fn drain_signals(&mut self) -> Vec<PetSignal> {
        std::mem::take(&mut self.outbox)
    }

    /// Switches the displayed animation, cancelling any pending revert. With a
    /// hold, the animation reverts to idle once it elapses.
    pub fn trigger(&mut self, key: AnimationKey, hold: Option<Duration>) {
        self.trigger_then(key, hold, AnimationKey::Idle);
    }

    pub fn trigger_then(&mut self, key: AnimationKey, hold: Option<Duration>, revert_to: AnimationKey) {
        self.revert = hold.map(|hold| PendingRevert {
            timer: Timer::new(hold, TimerMode::Once),
            revert_to,
        });
        self.animation = key;
        self.outbox.push(PetSignal::AnimationChanged(key));
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn trigger_named(&mut self, name: &str, hold: Option<Duration>) {
        self.trigger(AnimationKey::parse_or_idle(name), hold);
    }

    /// Startup wave.
    pub fn greet(&mut self) {
        self.trigger(AnimationKey::Greeting, Some(self.rules.reaction_hold));
    }

    /// Plays an animation the pet chose itself. Skipped while locked out and
    /// never counted as a user interaction.
    pub fn perform(&mut self, key: AnimationKey, hold: Option<Duration>) -> bool {
        if self.lockout.is_active() {
            return false;
        }
        self.trigger(key, hold);
        true
    }

    pub fn on_left_click(&mut self) -> Reaction {
        // Clicks that disturb a drink still count toward annoyance.
        if self.lockout.kind() != Some(LockoutKind::Angry) {
            self.click_count += 1;
        }
        if let Some(reaction) = self.guard_interaction() {
            return reaction;
        }

        if self.click_count >= self.rules.annoyance_threshold {
            self.click_count = 0;
            info!(target: "pet", "Clicked {} times; pet is annoyed", self.rules.annoyance_threshold);
            self.trigger(AnimationKey::Angry, Some(self.rules.reaction_hold));
            return Reaction::Annoyed;
        }

        let key = CLICK_REACTIONS[self.rng.usize(..CLICK_REACTIONS.len())];
        self.trigger(key, Some(self.rules.reaction_hold));
        Reaction::Played(key)
    }

    pub fn on_right_click(&mut self) -> Reaction {
        self.react(AnimationKey::HeartThrow, Some(self.rules.reaction_hold))
    }

    pub fn on_double_click(&mut self) -> Reaction {
        self.react(AnimationKey::Greeting, Some(self.rules.reaction_hold))
    }

    /// Keyboard-driven reaction, held for the key's default duration.
    pub fn on_command(&mut self, key: AnimationKey) -> Reaction {
        self.react(key, key.default_hold())
    }

    pub fn on_drag_move(&mut self, target: IVec2) -> Reaction {
        if let Some(reaction) = self.guard_interaction() {
            return reaction;
        }

        if self.run.take().is_some() && self.animation == AnimationKey::Running {
            self.trigger(AnimationKey::Idle, None);
        }
        self.position = self.clamp_to_screen(target);
        Reaction::Moved(self.position)
    }

    pub fn on_drag_release(&mut self) {
        if !self.lockout.is_active() {
            self.outbox.push(PetSignal::PersistPosition(self.position));
        }
    }

    /// Starts drinking. Rejected while a lockout is already active.
    pub fn feed(&mut self) -> bool {
        if let Some(kind) = self.lockout.kind() {
            debug!(target: "pet", "Feed rejected while {}", kind);
            return false;
        }

        self.touch();
        self.run = None;
        self.lockout = Lockout::drinking(self.rules.drinking);
        self.outbox.push(PetSignal::LockoutStarted(LockoutKind::Drinking));
        // The lockout expiry returns the pet to idle.
        self.trigger(AnimationKey::Drinking, None);
        true
    }

    /// Sleep or cry once the user has been away long enough. Runs regardless of lockout.
    pub fn poll_inactivity(&mut self) -> Option<AnimationKey> {
        let idle = self.idle_for();
        let (key, hold) = if idle > self.rules.cry_after {
            (AnimationKey::Crying, AnimationKey::Crying.default_hold())
        } else if idle > self.rules.sleep_after {
            (AnimationKey::Sleeping, None)
        } else {
            return None;
        };

        if self.animation == key {
            return None;
        }
        self.trigger(key, hold);
        Some(key)
    }

    pub fn run_to_random_location(&mut self) -> Option<IVec2> {
        if !self.screen_known {
            debug!(target: "pet", "Screen size unknown; not running yet");
            return None;
        }
        let target = self.bounds.random_point(&mut self.rng);
        self.run_to(target)
    }

    /// Runs to `target` (clamped). Skipped while locked out.
    pub fn run_to(&mut self, target: IVec2) -> Option<IVec2> {
        if self.lockout.is_active() {
            return None;
        }

        let target = self.clamp_to_screen(target);
        self.trigger(AnimationKey::Running, None);
        self.run = Some(RunTween::new(self.position, target, self.rules.run_duration));
        Some(target)
    }

    pub fn perform_random_idle_action(&mut self) -> Option<AnimationKey> {
        if self.animation != AnimationKey::Idle || self.lockout.is_active() {
            return None;
        }

        let key = IDLE_ACTIONS[self.rng.usize(..IDLE_ACTIONS.len())];
        self.trigger(key, key.default_hold());
        Some(key)
    }

    /// Advances every timer the coordinator owns.
    pub fn tick(&mut self, delta: Duration) {
        self.now += delta;

        if let Some(expired) = self.lockout.tick(delta) {
            self.outbox.push(PetSignal::LockoutEnded(expired));
            self.trigger(AnimationKey::Idle, None);
        }

        let revert_to = self.revert.as_mut().and_then(|pending| {
            pending
                .timer
                .tick(delta)
                .is_finished()
                .then_some(pending.revert_to)
        });
        if let Some(key) = revert_to {
            self.trigger(key, None);
        }

        if let Some(run) = self.run.as_mut() {
            let next = run.advance(delta);
            self.position = if self.screen_known {
                self.bounds.clamp(next)
            } else {
                next
            };
            if run.is_finished() {
                self.run = None;
                if self.animation == AnimationKey::Running {
                    self.trigger(AnimationKey::Idle, None);
                }
                self.outbox.push(PetSignal::PersistPosition(self.position));
            }
        }
    }

    fn clamp_to_screen(&self, position: IVec2) -> IVec2 {
        if self.screen_known {
            self.bounds.clamp(position)
        } else {
            position
        }
    }

    fn react(&mut self, key: AnimationKey, hold: Option<Duration>) -> Reaction {
        if let Some(reaction) = self.guard_interaction() {
            return reaction;
        }
        self.trigger(key, hold);
        Reaction::Played(key)
    }

    /// Applies the lockout rules shared by every user interaction and records
    /// the interaction time when the pet is not angry.
    fn guard_interaction(&mut self) -> Option<Reaction> {
        match self.lockout.kind() {
            Some(LockoutKind::Angry) => Some(Reaction::Ignored),
            Some(LockoutKind::Drinking) => {
                self.touch();
                self.lockout = Lockout::angry(self.rules.angry);
                self.outbox.push(PetSignal::LockoutStarted(LockoutKind::Angry));
                info!(target: "pet", "Disturbed while drinking; angry for {:?}", self.rules.angry);
                self.trigger(AnimationKey::Angry, None);
                Some(Reaction::Provoked)
            }
            None => {
                self.touch();
                None
            }
        }
    }

    fn touch(&mut self) {
        self.last_interaction = self.now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinator() -> PetCoordinator {
        PetCoordinator::with_rng(
            BehaviorRules::default(),
            ScreenBounds::new(UVec2::new(1000, 800), UVec2::new(200, 200)),
            IVec2::new(300, 300),
            fastrand::Rng::with_seed(42),
        )
    }

    fn advance(pet: &mut PetCoordinator, secs: u64) {
        for _ in 0..secs {
            pet.tick(Duration::from_secs(1));
        }
    }

    #[test]
    fn trigger_with_hold_reverts_to_idle() {
        let mut pet = coordinator();
        pet.trigger(AnimationKey::Dancing, Some(Duration::from_secs(8)));
        advance(&mut pet, 7);
        assert_eq!(pet.animation(), AnimationKey::Dancing);
        advance(&mut pet, 1);
        assert_eq!(pet.animation(), AnimationKey::Idle);
        assert!(!pet.has_pending_revert());
    }

    #[test]
    fn retrigger_cancels_pending_revert() {
        let mut pet = coordinator();
        pet.trigger(AnimationKey::Laugh, Some(Duration::from_secs(5)));
        advance(&mut pet, 4);
        pet.trigger(AnimationKey::Sitting, None);
        advance(&mut pet, 10);
        assert_eq!(pet.animation(), AnimationKey::Sitting);
    }

    #[test]
    fn trigger_then_reverts_to_requested_key() {
        let mut pet = coordinator();
        pet.trigger_then(
            AnimationKey::Watching,
            Some(Duration::from_secs(2)),
            AnimationKey::Laugh,
        );
        advance(&mut pet, 2);
        assert_eq!(pet.animation(), AnimationKey::Laugh);
    }

    #[test]
    fn unknown_names_trigger_idle() {
        let mut pet = coordinator();
        pet.trigger(AnimationKey::Excited, None);
        pet.trigger_named("breakdance", None);
        assert_eq!(pet.animation(), AnimationKey::Idle);
    }

    #[test]
    fn tenth_click_annoys_and_resets_counter() {
        let mut pet = coordinator();
        for _ in 0..9 {
            match pet.on_left_click() {
                Reaction::Played(key) => assert!(CLICK_REACTIONS.contains(&key)),
                other => panic!("unexpected reaction {:?}", other),
            }
        }
        assert_eq!(pet.click_count(), 9);

        assert_eq!(pet.on_left_click(), Reaction::Annoyed);
        assert_eq!(pet.click_count(), 0);
        assert_eq!(pet.animation(), AnimationKey::Angry);
        assert_eq!(pet.lockout(), None);

        advance(&mut pet, 5);
        assert_eq!(pet.animation(), AnimationKey::Idle);
    }

    #[test]
    fn every_tenth_click_annoys() {
        let mut pet = coordinator();
        for click in 1..=30 {
            let reaction = pet.on_left_click();
            if click % 10 == 0 {
                assert_eq!(reaction, Reaction::Annoyed, "click {}", click);
                assert_eq!(pet.click_count(), 0);
            } else {
                assert!(matches!(reaction, Reaction::Played(_)), "click {}: {:?}", click, reaction);
                assert_eq!(pet.click_count(), click % 10);
            }
        }
    }

    #[test]
    fn click_that_disturbs_a_drink_is_counted() {
        let mut pet = coordinator();
        for _ in 0..4 {
            pet.on_left_click();
        }
        assert!(pet.feed());
        assert_eq!(pet.on_left_click(), Reaction::Provoked);
        assert_eq!(pet.click_count(), 5);

        assert_eq!(pet.on_left_click(), Reaction::Ignored);
        assert_eq!(pet.click_count(), 5);
    }

    #[test]
    fn interrupting_drink_provokes_sixty_second_anger() {
        let mut pet = coordinator();
        assert!(pet.feed());
        advance(&mut pet, 3);

        assert_eq!(pet.on_left_click(), Reaction::Provoked);
        assert_eq!(pet.lockout(), Some(LockoutKind::Angry));
        assert_eq!(pet.lockout_remaining(), Duration::from_secs(60));
        assert_eq!(pet.animation(), AnimationKey::Angry);

        for _ in 0..5 {
            assert_eq!(pet.on_left_click(), Reaction::Ignored);
            assert_eq!(pet.on_right_click(), Reaction::Ignored);
            assert_eq!(pet.on_double_click(), Reaction::Ignored);
            assert_eq!(pet.on_drag_move(IVec2::new(10, 10)), Reaction::Ignored);
        }
        assert_eq!(pet.click_count(), 1);
        assert_eq!(pet.position(), IVec2::new(300, 300));

        advance(&mut pet, 59);
        assert_eq!(pet.lockout(), Some(LockoutKind::Angry));
        advance(&mut pet, 1);
        assert_eq!(pet.lockout(), None);
        assert_eq!(pet.animation(), AnimationKey::Idle);
    }

    #[test]
    fn drag_during_drink_also_provokes() {
        let mut pet = coordinator();
        pet.feed();
        assert_eq!(pet.on_drag_move(IVec2::new(0, 0)), Reaction::Provoked);
        assert_eq!(pet.position(), IVec2::new(300, 300));
        assert_eq!(pet.lockout(), Some(LockoutKind::Angry));
    }

    #[test]
    fn undisturbed_drink_returns_to_idle_without_anger() {
        let mut pet = coordinator();
        assert!(pet.feed());
        assert_eq!(pet.animation(), AnimationKey::Drinking);
        advance(&mut pet, 9);
        assert_eq!(pet.lockout(), Some(LockoutKind::Drinking));
        advance(&mut pet, 1);
        assert_eq!(pet.lockout(), None);
        assert_eq!(pet.animation(), AnimationKey::Idle);

        let signals = pet.drain_signals();
        assert!(signals.contains(&PetSignal::LockoutEnded(LockoutKind::Drinking)));
        assert!(!signals.contains(&PetSignal::LockoutStarted(LockoutKind::Angry)));
    }

    #[test]
    fn feed_is_rejected_while_locked_out() {
        let mut pet = coordinator();
        assert!(pet.feed());
        assert!(!pet.feed());
        pet.on_left_click();
        assert!(!pet.feed());
        assert_eq!(pet.lockout(), Some(LockoutKind::Angry));
    }

    #[test]
    fn inactivity_escalates_from_sleep_to_crying() {
        let mut pet = coordinator();
        advance(&mut pet, 30);
        assert_eq!(pet.poll_inactivity(), None);

        advance(&mut pet, 220);
        assert_eq!(pet.poll_inactivity(), Some(AnimationKey::Sleeping));
        assert_eq!(pet.poll_inactivity(), None);

        advance(&mut pet, 60);
        assert_eq!(pet.poll_inactivity(), Some(AnimationKey::Crying));
    }

    #[test]
    fn inactivity_poll_ignores_lockout() {
        let rules = BehaviorRules::from_toml("[inactivity]\nsleep_after_secs = 10.0\n")
            .expect("valid toml");
        let mut pet = PetCoordinator::with_rng(
            rules,
            ScreenBounds::default(),
            IVec2::ZERO,
            fastrand::Rng::with_seed(1),
        );
        pet.feed();
        pet.on_left_click();
        advance(&mut pet, 20);
        assert_eq!(pet.lockout(), Some(LockoutKind::Angry));
        assert_eq!(pet.poll_inactivity(), Some(AnimationKey::Sleeping));
    }

    #[test]
    fn interactions_reset_idle_time() {
        let mut pet = coordinator();
        advance(&mut pet, 100);
        pet.on_right_click();
        assert_eq!(pet.idle_for(), Duration::ZERO);
        assert_eq!(pet.animation(), AnimationKey::HeartThrow);
        assert_eq!(pet.poll_inactivity(), None);
    }

    #[test]
    fn drag_clamps_position_into_screen() {
        let mut pet = coordinator();
        for target in [
            IVec2::new(-500, -500),
            IVec2::new(5000, 5000),
            IVec2::new(900, -3),
            IVec2::new(123, 456),
        ] {
            let Reaction::Moved(position) = pet.on_drag_move(target) else {
                panic!("drag should move the pet");
            };
            assert!(position.x >= 0 && position.x <= 800);
            assert!(position.y >= 0 && position.y <= 600);
            assert_eq!(position, pet.position());
        }

        pet.drain_signals();
        pet.on_drag_release();
        assert_eq!(
            pet.drain_signals(),
            vec![PetSignal::PersistPosition(IVec2::new(123, 456))]
        );
    }

    #[test]
    fn run_reaches_target_then_persists() {
        let mut pet = coordinator();
        let target = pet.run_to(IVec2::new(700, 100)).expect("run should start");
        assert_eq!(pet.animation(), AnimationKey::Running);
        pet.drain_signals();

        for _ in 0..20 {
            pet.tick(Duration::from_millis(100));
        }

        assert_eq!(pet.position(), target);
        assert!(!pet.is_running());
        assert_eq!(pet.animation(), AnimationKey::Idle);
        assert!(pet
            .drain_signals()
            .contains(&PetSignal::PersistPosition(target)));
    }

    #[test]
    fn random_runs_stay_on_screen_and_skip_lockouts() {
        let mut pet = coordinator();
        for _ in 0..25 {
            let target = pet.run_to_random_location().expect("unlocked run");
            assert!(pet.bounds().contains(target));
            advance(&mut pet, 2);
        }

        pet.feed();
        assert_eq!(pet.run_to_random_location(), None);
    }

    #[test]
    fn drag_cancels_run() {
        let mut pet = coordinator();
        pet.run_to(IVec2::new(0, 0));
        pet.tick(Duration::from_millis(500));
        pet.on_drag_move(IVec2::new(500, 500));
        assert!(!pet.is_running());
        advance(&mut pet, 3);
        assert_eq!(pet.position(), IVec2::new(500, 500));
    }

    #[test]
    fn idle_actions_only_from_idle() {
        let mut pet = coordinator();
        let key = pet.perform_random_idle_action().expect("idle pet acts");
        assert!(IDLE_ACTIONS.contains(&key));
        assert_eq!(pet.perform_random_idle_action(), None);

        advance(&mut pet, 10);
        assert_eq!(pet.animation(), AnimationKey::Idle);
        pet.feed();
        pet.trigger(AnimationKey::Idle, None);
        assert_eq!(pet.perform_random_idle_action(), None);
    }

    #[test]
    fn saved_position_survives_until_the_real_screen_is_known() {
        let mut pet = PetCoordinator::awaiting_screen(
            BehaviorRules::default(),
            UVec2::new(320, 320),
            IVec2::new(2000, 1000),
        );
        assert_eq!(pet.position(), IVec2::new(2000, 1000));
        assert!(!pet.is_screen_known());
        assert_eq!(pet.run_to_random_location(), None);

        pet.set_bounds(ScreenBounds::new(UVec2::new(2560, 1440), UVec2::new(320, 320)));
        assert!(pet.is_screen_known());
        assert_eq!(pet.position(), IVec2::new(2000, 1000));
        assert!(pet.drain_signals().is_empty());
    }

    #[test]
    fn first_real_screen_clamps_an_offscreen_saved_position() {
        let mut pet = PetCoordinator::awaiting_screen(
            BehaviorRules::default(),
            UVec2::new(320, 320),
            IVec2::new(2000, 1000),
        );
        pet.set_bounds(ScreenBounds::new(UVec2::new(1920, 1080), UVec2::new(320, 320)));
        assert_eq!(pet.position(), IVec2::new(1600, 760));
        assert_eq!(
            pet.drain_signals(),
            vec![PetSignal::PersistPosition(IVec2::new(1600, 760))]
        );
    }

    #[test]
    fn shrinking_screen_reclamps_position() {
        let mut pet = coordinator();
        pet.drain_signals();
        pet.set_bounds(ScreenBounds::new(UVec2::new(400, 400), UVec2::new(200, 200)));
        assert_eq!(pet.position(), IVec2::new(200, 200));
        assert_eq!(
            pet.drain_signals(),
            vec![PetSignal::PersistPosition(IVec2::new(200, 200))]
        );
    }
}
