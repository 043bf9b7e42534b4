use super::router::PointerEvent;

/// A queue of pointer events.
/// The host pushes events between ticks; the controller drains them in
/// arrival order before the next simulation step.
#[derive(Debug, Clone)]
pub struct InputQueue {
    events: Vec<PointerEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: PointerEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<PointerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop pending events without delivering them.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::router::PointerPhase;
    use glam::Vec2;

    #[test]
    fn push_and_drain_keeps_order() {
        let mut q = InputQueue::new();
        q.push(PointerEvent::down(Vec2::new(10.0, 20.0)));
        q.push(PointerEvent::up(Vec2::new(10.0, 20.0)));
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events[0].phase, PointerPhase::Down);
        assert_eq!(events[1].phase, PointerPhase::Up);
        assert!(q.is_empty());
    }

    #[test]
    fn clear_discards_pending() {
        let mut q = InputQueue::new();
        q.push(PointerEvent::moved(Vec2::ZERO));
        q.clear();
        assert!(q.drain().is_empty());
    }
}
