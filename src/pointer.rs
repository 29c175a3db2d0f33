use glam::Vec2;
use winit::dpi::PhysicalPosition;
use winit::event::WindowEvent;

use crate::hover::HoverEvent;
use crate::phase::PhaseName;
use crate::scene::Scene;
use crate::viewport::Viewport;
use crate::{LoopEvent, Radio};

/// Remembers which phase the cursor is over and turns changes into
/// leave/enter pairs, the way element-level mouse events arrive.
#[derive(Debug, Default, Clone, Copy)]
pub struct HoverTracker {
    under: Option<PhaseName>,
}

impl HoverTracker {
    pub fn under(&self) -> Option<PhaseName> {
        self.under
    }

    pub fn moved_to(&mut self, phase: Option<PhaseName>) -> Vec<HoverEvent> {
        if phase == self.under {
            return Vec::new();
        }
        let mut events = Vec::with_capacity(2);
        if let Some(previous) = self.under {
            events.push(HoverEvent::Leave(previous));
        }
        if let Some(next) = phase {
            events.push(HoverEvent::Enter(next));
        }
        self.under = phase;
        events
    }

    /// Like `moved_to`, but while the view is not running the tracker
    /// forgets the phase, so the next running update enters it afresh.
    pub fn track(&mut self, phase: Option<PhaseName>, running: bool) -> Vec<HoverEvent> {
        if !running {
            self.reset();
            return Vec::new();
        }
        self.moved_to(phase)
    }

    pub fn reset(&mut self) {
        self.under = None;
    }
}

/// Handles cursor events and converts them to hover events
pub struct PointerHandler {
    tracker: HoverTracker,
    position: Option<PhysicalPosition<f64>>,
    radio: Radio,
}

impl PointerHandler {
    pub fn new(radio: Radio) -> Self {
        Self {
            tracker: HoverTracker::default(),
            position: None,
            radio,
        }
    }

    /// Returns true if the event was a pointer event.
    pub fn process_window_event(
        &mut self,
        event: &WindowEvent,
        scene: &Scene,
        viewport: &Viewport,
        running: bool,
    ) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.position = Some(*position);
                self.refresh(scene, viewport, running);
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.position = None;
                self.broadcast(None, running);
                true
            }
            _ => false,
        }
    }

    /// Hit-test the last cursor position again, after the scene moved under it.
    pub fn refresh(&mut self, scene: &Scene, viewport: &Viewport, running: bool) {
        let under = self.position.and_then(|position| {
            let pixel = Vec2::new(position.x as f32, position.y as f32);
            scene.hit_test(viewport.to_scene(pixel)).map(|hit| hit.phase)
        });
        self.broadcast(under, running);
    }

    fn broadcast(&mut self, under: Option<PhaseName>, running: bool) {
        for event in self.tracker.track(under, running) {
            LoopEvent::Hover(event).send(&self.radio);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_between_phases_leaves_then_enters() {
        let mut tracker = HoverTracker::default();
        assert_eq!(
            tracker.moved_to(Some(PhaseName::Deploy)),
            vec![HoverEvent::Enter(PhaseName::Deploy)]
        );
        assert!(tracker.moved_to(Some(PhaseName::Deploy)).is_empty());
        assert_eq!(
            tracker.moved_to(Some(PhaseName::Monitor)),
            vec![
                HoverEvent::Leave(PhaseName::Deploy),
                HoverEvent::Enter(PhaseName::Monitor)
            ]
        );
        assert_eq!(
            tracker.moved_to(None),
            vec![HoverEvent::Leave(PhaseName::Monitor)]
        );
        assert_eq!(tracker.under(), None);
    }

    #[test]
    fn phase_is_entered_again_after_remount() {
        let mut tracker = HoverTracker::default();
        assert_eq!(
            tracker.track(Some(PhaseName::Deploy), true),
            vec![HoverEvent::Enter(PhaseName::Deploy)]
        );
        // unmounted: the cursor keeps moving but nothing is delivered
        assert!(tracker.track(None, false).is_empty());
        assert!(tracker.track(Some(PhaseName::Deploy), false).is_empty());
        assert_eq!(tracker.under(), None);
        // mounted again with the cursor still on Deploy
        assert_eq!(
            tracker.track(Some(PhaseName::Deploy), true),
            vec![HoverEvent::Enter(PhaseName::Deploy)]
        );
    }

    #[test]
    fn reset_forgets_without_events() {
        let mut tracker = HoverTracker::default();
        tracker.moved_to(Some(PhaseName::Plan));
        tracker.reset();
        assert!(tracker.moved_to(None).is_empty());
    }
}
