//! The navigator's mutable state and its transition gate.

use flipbook_model::Direction;

use crate::error::NavigationRejected;

/// Whether a page turn is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Transitioning {
        from: usize,
        to: usize,
        direction: Direction,
    },
}

impl Phase {
    pub fn is_transitioning(&self) -> bool {
        matches!(self, Self::Transitioning { .. })
    }
}

/// Snapshot-able navigation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationState {
    pub current_index: usize,
    pub phase: Phase,
    /// Self-issued fragment writes whose notification has not arrived yet.
    /// Each notification consumes one.
    pub pending_self_writes: usize,
    /// True until startup has rendered the first page.
    pub initializing: bool,
    pub closed: bool,
}

impl NavigationState {
    pub fn new(current_index: usize) -> Self {
        Self {
            current_index,
            phase: Phase::Idle,
            pending_self_writes: 0,
            initializing: true,
            closed: false,
        }
    }

    /// Whether the next fragment notification is one of ours.
    pub fn suppress_routing(&self) -> bool {
        self.pending_self_writes > 0
    }

    /// Equivalent of the `animating` flag.
    pub fn is_animating(&self) -> bool {
        self.phase.is_transitioning()
    }

    /// Enter `Transitioning` towards `target`, or say why not.
    ///
    /// `target` must already be known to be in range.
    pub(crate) fn begin(&mut self, target: usize) -> Result<Direction, NavigationRejected> {
        if self.closed {
            return Err(NavigationRejected::Closed);
        }
        if self.is_animating() {
            return Err(NavigationRejected::Busy);
        }
        if target == self.current_index {
            return Err(NavigationRejected::AlreadyCurrent { index: target });
        }

        let direction = Direction::between(self.current_index, target);
        self.phase = Phase::Transitioning {
            from: self.current_index,
            to: target,
            direction,
        };
        Ok(direction)
    }

    /// Land on `index` and return to `Idle`.
    pub(crate) fn finish(&mut self, index: usize) {
        self.current_index = index;
        self.phase = Phase::Idle;
    }
}
