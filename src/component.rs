use instant::Instant;
use log::{debug, info, warn};

use crate::ambience::Ambience;
use crate::choreography::Choreography;
use crate::clock::{AnimationClock, AnimationTime};
use crate::hover::{HoverEvent, HoverState};
use crate::scene::{render, LoopState, Scene};

/// The mounted infinity-loop view. Owns its timer, hover state and
/// per-mount decoration; everything drawn comes from `render`.
#[derive(Debug)]
pub struct DevOpsLoop {
    seed: u64,
    clock: AnimationClock,
    hover: HoverState,
    mounted: bool,
    ambience: Ambience,
    choreography: Choreography,
}

impl DevOpsLoop {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            clock: AnimationClock::default(),
            hover: HoverState::default(),
            mounted: false,
            ambience: Ambience::new(seed),
            choreography: Choreography::default(),
        }
    }

    /// Start the tick timer. The entrance sequence begins on the first tick.
    pub fn mount(&mut self, now: Instant) {
        if !self.clock.start(now) {
            warn!("Loop already mounted, keeping the running timer");
            return;
        }
        self.ambience = Ambience::new(self.seed);
        info!("Loop mounted with seed {}", self.seed);
    }

    /// Stop the timer and forget time, hover and the mounted flag.
    pub fn unmount(&mut self) {
        if !self.clock.is_running() {
            return;
        }
        self.clock.stop();
        self.hover = HoverState::Idle;
        self.mounted = false;
        // next mount draws a fresh ambience
        self.seed = self.seed.wrapping_add(1);
        info!("Loop unmounted");
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn time(&self) -> AnimationTime {
        self.clock.time()
    }

    pub fn hovered(&self) -> HoverState {
        self.hover
    }

    pub fn ambience(&self) -> &Ambience {
        &self.ambience
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.clock.next_deadline()
    }

    /// Returns true when a tick fired and the picture changed.
    pub fn advance(&mut self, now: Instant) -> bool {
        if !self.clock.poll(now) {
            return false;
        }
        if !self.mounted {
            self.mounted = true;
            debug!("Entrance sequence started at {}", self.clock.time());
        }
        true
    }

    /// Hover events are ignored while the view is not running.
    pub fn hover(&mut self, event: HoverEvent) -> bool {
        if !self.clock.is_running() {
            return false;
        }
        let next = self.hover.apply(event);
        let changed = next != self.hover;
        self.hover = next;
        changed
    }

    pub fn state(&self) -> LoopState {
        LoopState {
            time: self.clock.time(),
            hovered: self.hover,
            mounted: self.mounted,
        }
    }

    pub fn render(&self) -> Scene {
        render(&self.state(), &self.ambience, &self.choreography)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TICK_PERIOD;
    use crate::phase::PhaseName;

    #[test]
    fn first_tick_sets_mounted() {
        let start = Instant::now();
        let mut view = DevOpsLoop::new(7);
        view.mount(start);
        assert!(!view.is_mounted());
        assert!(!view.advance(start));
        assert!(view.advance(start + TICK_PERIOD));
        assert!(view.is_mounted());
        assert_eq!(view.time().ticks(), 1);
    }

    #[test]
    fn unmount_resets_everything() {
        let start = Instant::now();
        let mut view = DevOpsLoop::new(7);
        view.mount(start);
        view.advance(start + TICK_PERIOD);
        view.hover(HoverEvent::Enter(PhaseName::Build));
        view.unmount();
        assert_eq!(view.state(), LoopState::default());
        assert!(!view.advance(start + TICK_PERIOD * 10));
        assert!(!view.hover(HoverEvent::Enter(PhaseName::Code)));
        assert_eq!(view.next_deadline(), None);
    }

    #[test]
    fn remount_draws_new_ambience() {
        let start = Instant::now();
        let mut view = DevOpsLoop::new(1);
        view.mount(start);
        let first = view.ambience().clone();
        view.unmount();
        view.mount(start);
        assert_ne!(&first, view.ambience());
    }
}
