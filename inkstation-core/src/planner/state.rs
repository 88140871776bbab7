//! Per-region refresh state machine
//!
//! Every region starts a cycle `Clean` and is driven by the events that
//! apply to it. `NeedsFull` absorbs every event, so an upgrade to a full
//! refresh always wins over a partial one.

/// Refresh requirement of one region in one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionState {
    /// Nothing to write
    Clean,
    /// Write with a partial refresh
    NeedsPartial,
    /// Write with a full refresh
    NeedsFull,
}

/// Facts about a region that move it between states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionEvent {
    /// The region cache reported the region dirty
    Dirty,
    /// The region has never been written
    FirstWrite,
    /// Too many cycles since the last full refresh
    AgeExceeded,
    /// Too many partial refreshes since the last full refresh
    GhostingLimit,
    /// Caller asked for a full refresh of everything
    ForceFull,
}

impl RegionState {
    /// Check if the region is written this cycle
    pub fn needs_write(&self) -> bool {
        !matches!(self, RegionState::Clean)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: RegionEvent) -> Self {
        use RegionEvent::*;
        use RegionState::*;

        match (self, event) {
            (NeedsFull, _) => NeedsFull,

            // Forced writes skip the diff entirely
            (_, ForceFull) => NeedsFull,

            (Clean, Dirty) => NeedsPartial,
            // A clean region stays clean; upgrades only apply to writes
            (Clean, FirstWrite | AgeExceeded | GhostingLimit) => Clean,

            (NeedsPartial, Dirty) => NeedsPartial,
            (NeedsPartial, FirstWrite | AgeExceeded | GhostingLimit) => NeedsFull,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirty_is_partial() {
        let state = RegionState::Clean.transition(RegionEvent::Dirty);
        assert_eq!(state, RegionState::NeedsPartial);
        assert!(state.needs_write());
    }

    #[test]
    fn test_upgrades_to_full() {
        for event in [
            RegionEvent::FirstWrite,
            RegionEvent::AgeExceeded,
            RegionEvent::GhostingLimit,
        ] {
            let state = RegionState::Clean
                .transition(RegionEvent::Dirty)
                .transition(event);
            assert_eq!(state, RegionState::NeedsFull, "{event:?}");
        }
    }

    #[test]
    fn test_clean_ignores_upgrades() {
        let state = RegionState::Clean.transition(RegionEvent::GhostingLimit);
        assert_eq!(state, RegionState::Clean);
        assert!(!state.needs_write());
    }

    #[test]
    fn test_full_is_sticky() {
        let state = RegionState::Clean
            .transition(RegionEvent::ForceFull)
            .transition(RegionEvent::Dirty);
        assert_eq!(state, RegionState::NeedsFull);
    }
}
