//! Browser bindings for the skill-check engine.
//!
//! The host calls `skill_check_init` once, `skill_check_start` when combat
//! asks for a check, forwards pointer events, and calls `skill_check_frame`
//! from `requestAnimationFrame`. Outcomes and cues are read back through
//! linear-memory pointers, the same way the view snapshot is read as JSON.

pub mod runner;

use std::cell::RefCell;

use skillcheck_engine::glam::Vec2;
use skillcheck_engine::{Clock, PointerEvent, SkillCheckConfig};
use wasm_bindgen::prelude::*;

pub use runner::SkillCheckRunner;

/// Milliseconds from `performance.now()`, falling back to `Date.now()`
/// when no window is available (workers, tests under node).
#[derive(Debug, Default, Clone, Copy)]
pub struct PerformanceClock;

impl Clock for PerformanceClock {
    fn now(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }
}

thread_local! {
    static RUNNER: RefCell<Option<SkillCheckRunner<PerformanceClock>>> = const { RefCell::new(None) };
}

/// Run `f` against the runner. Returns `None` before `skill_check_init`.
fn with_runner<R>(f: impl FnOnce(&mut SkillCheckRunner<PerformanceClock>) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("skill check runner not initialized; call skill_check_init() first");
                None
            }
        }
    })
}

#[wasm_bindgen]
pub fn skill_check_init(config_json: Option<String>) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = match config_json.as_deref().map(SkillCheckConfig::from_json) {
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            log::warn!("{e}; using default config");
            SkillCheckConfig::default()
        }
        None => SkillCheckConfig::default(),
    };

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(SkillCheckRunner::new(config, PerformanceClock));
    });
    log::info!("skill check: initialized");
}

/// Start a session. Returns the session id, or -1 when the codes are invalid.
#[wasm_bindgen]
pub fn skill_check_start(variant: u32, ability_kind: u32, sonic: bool) -> i32 {
    with_runner(|r| match r.start(variant, ability_kind, sonic) {
        Ok(id) => id.0 as i32,
        Err(e) => {
            log::warn!("skill check not started: {e}");
            -1
        }
    })
    .unwrap_or(-1)
}

#[wasm_bindgen]
pub fn skill_check_cancel() {
    with_runner(|r| r.cancel());
}

#[wasm_bindgen]
pub fn skill_check_frame() {
    with_runner(|r| r.frame());
}

#[wasm_bindgen]
pub fn skill_check_pointer_down(x: f32, y: f32) {
    with_runner(|r| r.push_input(PointerEvent::down(Vec2::new(x, y))));
}

#[wasm_bindgen]
pub fn skill_check_pointer_move(x: f32, y: f32) {
    with_runner(|r| r.push_input(PointerEvent::moved(Vec2::new(x, y))));
}

#[wasm_bindgen]
pub fn skill_check_pointer_up(x: f32, y: f32) {
    with_runner(|r| r.push_input(PointerEvent::up(Vec2::new(x, y))));
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn skill_check_outcome_ready() -> bool {
    with_runner(|r| r.outcome().is_some()).unwrap_or(false)
}

/// Four floats: session, multiplier, secondary, has_secondary.
#[wasm_bindgen]
pub fn skill_check_outcome_ptr() -> *const f32 {
    with_runner(|r| r.outcome_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn skill_check_cues_ptr() -> *const u8 {
    with_runner(|r| r.cues_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn skill_check_cues_len() -> u32 {
    with_runner(|r| r.cues_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn skill_check_cue_name(code: u8) -> String {
    runner::cue_name(code).to_string()
}

/// JSON snapshot of the active session, or `null`.
#[wasm_bindgen]
pub fn skill_check_view_json() -> String {
    with_runner(|r| r.view_json()).unwrap_or_else(|| "null".to_string())
}
