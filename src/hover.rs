use serde::Serialize;

use crate::phase::PhaseName;

/// Where a pointer event landed; all three represent the same phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Region {
    Segment,
    Label,
    Legend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverEvent {
    Enter(PhaseName),
    Leave(PhaseName),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum HoverState {
    #[default]
    Idle,
    Hovering(PhaseName),
}

impl HoverState {
    /// The last entered phase wins; any leave returns to idle.
    pub fn apply(self, event: HoverEvent) -> HoverState {
        match event {
            HoverEvent::Enter(phase) => HoverState::Hovering(phase),
            HoverEvent::Leave(_) => HoverState::Idle,
        }
    }

    pub fn phase(&self) -> Option<PhaseName> {
        match self {
            HoverState::Idle => None,
            HoverState::Hovering(phase) => Some(*phase),
        }
    }

    pub fn is_active(&self, phase: PhaseName) -> bool {
        self.phase() == Some(phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn enter_then_leave_returns_to_idle() {
        for phase in PhaseName::iter() {
            let state = HoverState::Idle.apply(HoverEvent::Enter(phase));
            assert_eq!(state, HoverState::Hovering(phase));
            assert!(state.is_active(phase));
            assert_eq!(state.apply(HoverEvent::Leave(phase)), HoverState::Idle);
        }
    }

    #[test]
    fn last_entered_wins() {
        let state = HoverState::Idle
            .apply(HoverEvent::Enter(PhaseName::Build))
            .apply(HoverEvent::Enter(PhaseName::Release));
        assert_eq!(state, HoverState::Hovering(PhaseName::Release));
        assert!(!state.is_active(PhaseName::Build));
    }

    #[test]
    fn leave_from_idle_stays_idle() {
        let state = HoverState::Idle.apply(HoverEvent::Leave(PhaseName::Plan));
        assert_eq!(state, HoverState::Idle);
        assert_eq!(state.phase(), None);
    }
}
