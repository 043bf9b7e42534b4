use glam::Vec2;

use super::state::SkillCheckSession;
use super::view::SessionView;
use crate::api::config::SkillCheckConfig;
use crate::api::emitter::OutcomeEmitter;
use crate::api::error::SkillCheckError;
use crate::api::types::{Cue, Outcome, SessionId, SkillCheckRequest};
use crate::core::rng::{RandomSource, Rng};
use crate::core::time::Clock;
use crate::input::queue::InputQueue;
use crate::input::router::{InputRouter, PointerEvent};

/// Owns the single active skill-check session.
///
/// The host calls [`tick`](Self::tick) once per frame while a session is
/// active and forwards pointer events between ticks. Ticks and inputs are
/// serialized through `&mut self`, so an input is always visible to the
/// next tick. [`resolve`](Self::resolve) fires the emitter at most once per
/// session, whichever path gets there first.
pub struct SessionController<E: OutcomeEmitter, R: RandomSource = Rng> {
    config: SkillCheckConfig,
    router: InputRouter,
    rng: R,
    emitter: E,
    session: Option<SkillCheckSession>,
    next_id: u32,
    /// Timestamp of the latest start or tick; inputs are stamped with it.
    last_now: f64,
    queue: InputQueue,
    cues: Vec<Cue>,
}

impl<E: OutcomeEmitter> SessionController<E, Rng> {
    /// Controller with the default xorshift random source seeded from config.
    pub fn new(config: SkillCheckConfig, emitter: E) -> Self {
        let rng = Rng::new(config.seed);
        Self::with_random(config, emitter, rng)
    }
}

impl<E: OutcomeEmitter, R: RandomSource> SessionController<E, R> {
    pub fn with_random(config: SkillCheckConfig, emitter: E, rng: R) -> Self {
        Self {
            router: InputRouter::new(config.surface),
            config,
            rng,
            emitter,
            session: None,
            next_id: 1,
            last_now: 0.0,
            queue: InputQueue::new(),
            cues: Vec::with_capacity(16),
        }
    }

    /// Start a new session, discarding any prior one.
    pub fn start(&mut self, request: SkillCheckRequest, now: f64) -> SessionId {
        self.discard("superseded");
        let id = SessionId(self.next_id);
        self.next_id += 1;
        self.last_now = now;
        self.session = Some(SkillCheckSession::new(id, request, now, &mut self.rng));
        log::info!(
            "skill check {} started: {} ({:?}{})",
            id.0,
            request.variant,
            request.ability.kind,
            if request.ability.sonic { ", sonic" } else { "" }
        );
        id
    }

    /// Start from host-supplied codes. An unknown code leaves the controller
    /// idle until the next valid start.
    pub fn start_codes(
        &mut self,
        variant: u32,
        ability_kind: u32,
        sonic: bool,
        now: f64,
    ) -> Result<SessionId, SkillCheckError> {
        match SkillCheckRequest::from_codes(variant, ability_kind, sonic) {
            Ok(request) => Ok(self.start(request, now)),
            Err(err) => {
                log::warn!("skill check rejected: {}", err);
                self.cancel();
                Err(err)
            }
        }
    }

    /// Drop the active session without resolving it.
    pub fn cancel(&mut self) {
        self.discard("cancelled");
    }

    fn discard(&mut self, reason: &str) {
        if let Some(prev) = self.session.take() {
            if !prev.is_done() {
                log::info!("skill check {} {} before resolving", prev.id().0, reason);
            }
        }
        self.queue.clear();
        self.cues.clear();
    }

    /// Advance the active session by one simulation step.
    pub fn tick(&mut self, now: f64) {
        self.last_now = self.last_now.max(now);
        self.pump();
        let now = self.last_now;
        let outcome = match self.session.as_mut() {
            Some(session) => session.tick(&self.config, &mut self.rng, &mut self.cues, now),
            None => None,
        };
        if let Some(outcome) = outcome {
            self.resolve_outcome(outcome);
        }
    }

    pub fn tick_with(&mut self, clock: &impl Clock) {
        self.tick(clock.now());
    }

    /// Queue an event for delivery at the start of the next tick.
    pub fn push_input(&mut self, event: PointerEvent) {
        if self.is_active() {
            self.queue.push(event);
        }
    }

    /// Deliver queued events in arrival order.
    pub fn pump(&mut self) {
        for event in self.queue.drain() {
            self.handle_pointer(event);
        }
    }

    /// Deliver one pointer event now. Returns false when it was ignored
    /// (no session, session done, or a result on display).
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        let routed = self.router.route(event);
        let now = self.last_now;
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.accepts_input() {
            log::debug!("skill check {}: {:?} ignored", session.id().0, event.phase);
            return false;
        }
        if let Some(outcome) =
            session.input(&routed, &self.config, &mut self.rng, &mut self.cues, now)
        {
            self.resolve_outcome(outcome);
        }
        true
    }

    pub fn handle_pointer_down(&mut self, position: Vec2) -> bool {
        self.handle_pointer(PointerEvent::down(position))
    }

    pub fn handle_pointer_move(&mut self, position: Vec2) -> bool {
        self.handle_pointer(PointerEvent::moved(position))
    }

    pub fn handle_pointer_up(&mut self, position: Vec2) -> bool {
        self.handle_pointer(PointerEvent::up(position))
    }

    /// Resolve the active session. Only the first call per session reaches
    /// the emitter; later calls return false.
    pub fn resolve(&mut self, multiplier: f32, secondary: Option<f32>) -> bool {
        self.resolve_outcome(Outcome { multiplier, secondary })
    }

    fn resolve_outcome(&mut self, outcome: Outcome) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.is_done() {
            log::debug!("skill check {}: duplicate resolution ignored", session.id().0);
            return false;
        }
        session.finish();
        let id = session.id();
        log::info!(
            "skill check {} resolved: x{}{}",
            id.0,
            outcome.multiplier,
            outcome
                .secondary
                .map(|s| format!(" (secondary x{})", s))
                .unwrap_or_default()
        );
        self.emitter.on_complete(id, outcome);
        true
    }

    /// A session exists and has not resolved yet.
    pub fn is_active(&self) -> bool {
        self.session.as_ref().is_some_and(|s| !s.is_done())
    }

    pub fn session(&self) -> Option<&SkillCheckSession> {
        self.session.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn session_mut(&mut self) -> Option<&mut SkillCheckSession> {
        self.session.as_mut()
    }

    /// Snapshot for the rendering layer.
    pub fn view(&self) -> Option<SessionView> {
        self.session
            .as_ref()
            .map(|s| SessionView::capture(s, self.last_now))
    }

    /// Take the cues emitted since the last call.
    pub fn take_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    pub fn emitter(&self) -> &E {
        &self.emitter
    }

    pub fn emitter_mut(&mut self) -> &mut E {
        &mut self.emitter
    }

    pub fn config(&self) -> &SkillCheckConfig {
        &self.config
    }

    pub fn last_now(&self) -> f64 {
        self.last_now
    }
}
