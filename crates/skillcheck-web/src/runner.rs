use skillcheck_engine::{
    Clock, Cue, FramePacer, LatestOutcome, OutcomeRecord, PointerEvent, SessionController,
    SessionId, SkillCheckConfig, SkillCheckError, SkillCheckRequest,
};

/// Drives one [`SessionController`] from browser frame callbacks.
///
/// The exported free functions in `lib.rs` keep a `thread_local!` runner,
/// because wasm-bindgen cannot export generic structs directly.
pub struct SkillCheckRunner<C: Clock> {
    controller: SessionController<LatestOutcome>,
    clock: C,
    pacer: FramePacer,
    last_frame: Option<f64>,
    /// Flat buffer of cue codes for linear-memory reads.
    cue_buffer: Vec<u8>,
    /// Latest outcome, packed for linear-memory reads.
    outcome: OutcomeRecord,
    outcome_ready: bool,
}

impl<C: Clock> SkillCheckRunner<C> {
    pub fn new(config: SkillCheckConfig, clock: C) -> Self {
        let pacer = FramePacer::new(config.tick_ms);
        Self {
            controller: SessionController::new(config, LatestOutcome::new()),
            clock,
            pacer,
            last_frame: None,
            cue_buffer: Vec::with_capacity(32),
            outcome: OutcomeRecord::default(),
            outcome_ready: false,
        }
    }

    /// Start a session from host codes. Any previous session is discarded.
    pub fn start(&mut self, variant: u32, ability_kind: u32, sonic: bool) -> Result<SessionId, SkillCheckError> {
        self.reset_frame_state();
        let now = self.clock.now();
        self.controller.start_codes(variant, ability_kind, sonic, now)
    }

    pub fn start_request(&mut self, request: SkillCheckRequest) -> SessionId {
        self.reset_frame_state();
        let now = self.clock.now();
        self.controller.start(request, now)
    }

    /// Stop ticking and discard the session without an outcome.
    pub fn cancel(&mut self) {
        self.controller.cancel();
        self.reset_frame_state();
    }

    fn reset_frame_state(&mut self) {
        self.pacer.reset();
        self.last_frame = None;
        self.cue_buffer.clear();
        self.controller.emitter_mut().clear();
        self.outcome = OutcomeRecord::default();
        self.outcome_ready = false;
    }

    /// Queue a pointer event; it lands before the next tick.
    pub fn push_input(&mut self, event: PointerEvent) {
        self.controller.push_input(event);
    }

    /// Run one display frame: as many fixed ticks as the elapsed time allows.
    pub fn frame(&mut self) {
        // Cues live for one frame, even after the session has resolved
        self.cue_buffer.clear();
        if !self.controller.is_active() {
            return;
        }
        let now = self.clock.now();
        let frame_ms = self.last_frame.map_or(self.pacer.tick_ms(), |last| now - last);
        self.last_frame = Some(now);

        let steps = self.pacer.accumulate(frame_ms);
        for _ in 0..steps {
            self.controller.tick(now);
            if !self.controller.is_active() {
                break;
            }
        }
        // Inputs still count on frames too short for a tick
        if steps == 0 {
            self.controller.pump();
        }

        for cue in self.controller.take_cues() {
            self.cue_buffer.push(cue.code());
        }
        if let Some((id, outcome)) = self.controller.emitter().get() {
            if !self.outcome_ready && self.controller.session().is_some_and(|s| s.id() == id) {
                self.outcome = OutcomeRecord::new(id, &outcome);
                self.outcome_ready = true;
            }
        }
    }

    pub fn controller(&self) -> &SessionController<LatestOutcome> {
        &self.controller
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn outcome(&self) -> Option<OutcomeRecord> {
        self.outcome_ready.then_some(self.outcome)
    }

    pub fn view_json(&self) -> String {
        self.controller
            .view()
            .and_then(|view| serde_json::to_string(&view).ok())
            .unwrap_or_else(|| "null".to_string())
    }

    // ---- Pointer accessors for linear-memory reads ----

    pub fn outcome_ptr(&self) -> *const f32 {
        &self.outcome as *const OutcomeRecord as *const f32
    }

    pub fn cues_ptr(&self) -> *const u8 {
        self.cue_buffer.as_ptr()
    }

    pub fn cues_len(&self) -> u32 {
        self.cue_buffer.len() as u32
    }

    pub fn cues(&self) -> &[u8] {
        &self.cue_buffer
    }
}

/// Cue codes, for hosts that prefer names over numbers.
pub fn cue_name(code: u8) -> &'static str {
    const CUES: [Cue; 7] = [
        Cue::Tap,
        Cue::Hit,
        Cue::Miss,
        Cue::StageCleared { stage: 0 },
        Cue::Collected { id: 0 },
        Cue::Haptic,
        Cue::Complete,
    ];
    CUES.iter()
        .find(|c| c.code() == code)
        .map(|c| match c {
            Cue::Tap => "tap",
            Cue::Hit => "hit",
            Cue::Miss => "miss",
            Cue::StageCleared { .. } => "stage",
            Cue::Collected { .. } => "collected",
            Cue::Haptic => "haptic",
            Cue::Complete => "complete",
        })
        .unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillcheck_engine::{ManualClock, Variant};
    use skillcheck_engine::glam::Vec2;

    const FRAME: f64 = 1000.0 / 60.0;

    fn runner() -> SkillCheckRunner<ManualClock> {
        SkillCheckRunner::new(SkillCheckConfig::default(), ManualClock::new(0.0))
    }

    #[test]
    fn unknown_variant_is_rejected_and_idle() {
        let mut r = runner();
        assert!(r.start(77, 0, false).is_err());
        r.frame();
        assert!(r.outcome().is_none());
        assert_eq!(r.view_json(), "null");
    }

    #[test]
    fn timing_tap_publishes_outcome_record() {
        let mut r = runner();
        let id = r.start(Variant::Timing.code(), 0, false).unwrap();
        r.push_input(PointerEvent::down(Vec2::splat(50.0)));
        r.clock_mut().advance(FRAME);
        r.frame();
        let rec = r.outcome().unwrap();
        assert_eq!(rec.session, id.0 as f32);
        assert!([2.0, 1.5, 1.2, 0.5].contains(&rec.multiplier));
        assert_eq!(rec.has_secondary, 0.0);
        assert!(r.cues().contains(&Cue::Hit.code()) || r.cues().contains(&Cue::Miss.code()));
    }

    #[test]
    fn cues_are_not_replayed_after_resolution() {
        let mut r = runner();
        r.start(Variant::Timing.code(), 0, false).unwrap();
        r.push_input(PointerEvent::down(Vec2::splat(50.0)));
        r.clock_mut().advance(FRAME);
        r.frame();
        assert!(!r.cues().is_empty());
        for _ in 0..2 {
            r.clock_mut().advance(FRAME);
            r.frame();
        }
        assert!(r.cues().is_empty(), "stale cues: {:?}", r.cues());
        assert_eq!(r.cues_len(), 0);
        assert!(r.outcome().is_some(), "outcome stays readable");
    }

    #[test]
    fn new_start_forgets_previous_outcome() {
        let mut r = runner();
        r.start(Variant::Timing.code(), 0, false).unwrap();
        r.push_input(PointerEvent::down(Vec2::splat(50.0)));
        r.clock_mut().advance(FRAME);
        r.frame();
        assert!(r.controller().emitter().get().is_some());

        r.start(Variant::Mash.code(), 0, false).unwrap();
        assert!(r.controller().emitter().get().is_none());
        r.clock_mut().advance(FRAME);
        r.frame();
        assert!(r.outcome().is_none());
    }

    #[test]
    fn mash_times_out_through_frames() {
        let mut r = runner();
        r.start(Variant::Mash.code(), 0, false).unwrap();
        for _ in 0..400 {
            r.clock_mut().advance(FRAME);
            r.frame();
        }
        let rec = r.outcome().unwrap();
        assert_eq!(rec.multiplier, 0.0);
        assert!(!r.controller().is_active());
    }

    #[test]
    fn high_refresh_frames_do_not_speed_up_decay() {
        let mut slow = runner();
        let mut fast = runner();
        for r in [&mut slow, &mut fast] {
            r.start(Variant::Reflex.code(), 1, false).unwrap();
        }
        for _ in 0..60 {
            slow.clock_mut().advance(FRAME);
            slow.frame();
        }
        for _ in 0..120 {
            fast.clock_mut().advance(FRAME / 2.0);
            fast.frame();
        }
        let value = |r: &SkillCheckRunner<ManualClock>| {
            let json: serde_json::Value = serde_json::from_str(&r.view_json()).unwrap();
            json["detail"]["targets"][0]["value"].as_f64().unwrap()
        };
        assert!((value(&slow) - value(&fast)).abs() <= 0.75 + 1e-6);
    }

    #[test]
    fn cancel_clears_outcome_and_view() {
        let mut r = runner();
        r.start(Variant::Drain.code(), 0, false).unwrap();
        r.clock_mut().advance(FRAME);
        r.frame();
        r.cancel();
        assert_eq!(r.view_json(), "null");
        assert!(r.outcome().is_none());
    }

    #[test]
    fn cue_names_cover_codes() {
        assert_eq!(cue_name(Cue::Haptic.code()), "haptic");
        assert_eq!(cue_name(200), "unknown");
    }
}
