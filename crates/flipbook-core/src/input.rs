//! Mapping raw user input to page-turn directions.

use flipbook_model::Direction;

/// Minimum horizontal travel for a touch gesture to count as a swipe.
pub const SWIPE_THRESHOLD_PX: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key(Key),
    /// Touch start and end x positions in pixels.
    Swipe { start_x: f32, end_x: f32 },
    PrevButton,
    NextButton,
}

impl InputEvent {
    /// The page turn this input asks for, if any.
    pub fn direction(&self) -> Option<Direction> {
        match *self {
            Self::Key(Key::ArrowLeft) | Self::PrevButton => Some(Direction::Backward),
            Self::Key(Key::ArrowRight) | Self::NextButton => Some(Direction::Forward),
            Self::Swipe { start_x, end_x } => {
                let travel = start_x - end_x;
                if travel > SWIPE_THRESHOLD_PX {
                    // finger moved left
                    Some(Direction::Forward)
                } else if travel < -SWIPE_THRESHOLD_PX {
                    Some(Direction::Backward)
                } else {
                    None
                }
            }
        }
    }
}
