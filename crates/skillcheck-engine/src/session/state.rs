use crate::api::config::SkillCheckConfig;
use crate::api::types::{AbilityDescriptor, Cue, Feedback, Outcome, SessionId, SkillCheckRequest, Variant};
use crate::core::rng::RandomSource;
use crate::input::router::RoutedInput;
use crate::variants::{Step, StepContext, VariantState};

/// Work deferred until a display delay has passed.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PendingAction {
    Resume,
    Resolve(Outcome),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pending {
    at: f64,
    action: PendingAction,
}

/// One in-progress skill check, from start to resolution.
///
/// Only the [`SessionController`](super::controller::SessionController)
/// mutates a session; everything else sees it through read-only accessors
/// or a [`SessionView`](super::view::SessionView) snapshot.
#[derive(Debug, Clone)]
pub struct SkillCheckSession {
    id: SessionId,
    variant: Variant,
    ability: AbilityDescriptor,
    start_time: f64,
    done: bool,
    paused: bool,
    pending: Option<Pending>,
    feedback: Option<Feedback>,
    state: VariantState,
}

impl SkillCheckSession {
    pub(crate) fn new(
        id: SessionId,
        request: SkillCheckRequest,
        now: f64,
        rng: &mut dyn RandomSource,
    ) -> Self {
        Self {
            id,
            variant: request.variant,
            ability: request.ability,
            start_time: now,
            done: false,
            paused: false,
            pending: None,
            feedback: None,
            state: VariantState::spawn(request.variant, request.ability, rng),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn ability(&self) -> AbilityDescriptor {
        self.ability
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn elapsed(&self, now: f64) -> f64 {
        (now - self.start_time).max(0.0)
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Input only registers while the session is live and not showing a result.
    pub fn accepts_input(&self) -> bool {
        !self.done && !self.paused
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    pub fn state(&self) -> &VariantState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut VariantState {
        &mut self.state
    }

    /// Advance one simulation step. Returns an outcome when the session
    /// should resolve now.
    pub(crate) fn tick(
        &mut self,
        config: &SkillCheckConfig,
        rng: &mut dyn RandomSource,
        cues: &mut Vec<Cue>,
        now: f64,
    ) -> Option<Outcome> {
        if self.done {
            return None;
        }

        if let Some(pending) = self.pending {
            if now < pending.at {
                return None;
            }
            self.pending = None;
            match pending.action {
                PendingAction::Resolve(outcome) => return Some(outcome),
                PendingAction::Resume => {
                    self.paused = false;
                    let mut ctx = StepContext {
                        now,
                        elapsed: self.elapsed(now),
                        config,
                        rng,
                        cues,
                        feedback: &mut self.feedback,
                    };
                    self.state.resume(&mut ctx);
                    return None;
                }
            }
        }

        if self.paused {
            return None;
        }

        let mut ctx = StepContext {
            now,
            elapsed: self.elapsed(now),
            config,
            rng,
            cues,
            feedback: &mut self.feedback,
        };
        let step = self.state.tick(&mut ctx);
        self.apply(step, now)
    }

    /// Feed one routed pointer event. Callers check `accepts_input` first.
    pub(crate) fn input(
        &mut self,
        input: &RoutedInput,
        config: &SkillCheckConfig,
        rng: &mut dyn RandomSource,
        cues: &mut Vec<Cue>,
        now: f64,
    ) -> Option<Outcome> {
        if !self.accepts_input() {
            return None;
        }
        let mut ctx = StepContext {
            now,
            elapsed: self.elapsed(now),
            config,
            rng,
            cues,
            feedback: &mut self.feedback,
        };
        let step = self.state.input(input, &mut ctx);
        self.apply(step, now)
    }

    /// Mark resolved. Freezes the session and drops any deferred work.
    pub(crate) fn finish(&mut self) {
        self.done = true;
        self.paused = true;
        self.pending = None;
    }

    fn apply(&mut self, step: Step, now: f64) -> Option<Outcome> {
        match step {
            Step::Continue => None,
            Step::Pause { delay_ms } => {
                self.paused = true;
                self.pending = Some(Pending {
                    at: now + delay_ms,
                    action: PendingAction::Resume,
                });
                None
            }
            Step::Resolve(outcome) => {
                self.paused = true;
                Some(outcome)
            }
            Step::ResolveAfter { delay_ms, outcome } => {
                self.paused = true;
                self.pending = Some(Pending {
                    at: now + delay_ms,
                    action: PendingAction::Resolve(outcome),
                });
                None
            }
        }
    }
}
