use super::types::{Outcome, SessionId};

/// Receives the final outcome of a session. Called at most once per session.
pub trait OutcomeEmitter {
    fn on_complete(&mut self, session: SessionId, outcome: Outcome);
}

impl<F: FnMut(SessionId, Outcome)> OutcomeEmitter for F {
    fn on_complete(&mut self, session: SessionId, outcome: Outcome) {
        self(session, outcome)
    }
}

/// Emitter that keeps every outcome it receives, newest last.
#[derive(Debug, Clone, Default)]
pub struct RecordedOutcomes {
    outcomes: Vec<(SessionId, Outcome)>,
}

impl RecordedOutcomes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&(SessionId, Outcome)> {
        self.outcomes.last()
    }

    /// Outcome delivered for a given session, if any.
    pub fn for_session(&self, session: SessionId) -> Option<Outcome> {
        self.outcomes
            .iter()
            .find(|(id, _)| *id == session)
            .map(|(_, outcome)| *outcome)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(SessionId, Outcome)> {
        self.outcomes.iter()
    }
}

impl OutcomeEmitter for RecordedOutcomes {
    fn on_complete(&mut self, session: SessionId, outcome: Outcome) {
        self.outcomes.push((session, outcome));
    }
}

/// Emitter that keeps only the most recent outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatestOutcome {
    latest: Option<(SessionId, Outcome)>,
}

impl LatestOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<(SessionId, Outcome)> {
        self.latest
    }

    pub fn clear(&mut self) {
        self.latest = None;
    }
}

impl OutcomeEmitter for LatestOutcome {
    fn on_complete(&mut self, session: SessionId, outcome: Outcome) {
        self.latest = Some((session, outcome));
    }
}
