//! Newtype wrappers and closed enumerations shared across the crate.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Number of legal actions per state.
pub const NUM_ACTIONS: usize = 3;

/// Number of distinct discrete states (3·3·3·2·2·3).
pub const NUM_STATES: usize = 324;

/// Paddle command chosen by an agent each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Up = 0,
    Down = 1,
    Stay = 2,
}

impl Action {
    /// All actions in scan order.
    pub const ALL: [Action; NUM_ACTIONS] = [Action::Up, Action::Down, Action::Stay];

    /// Index of the action within [`Action::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Build an action from its index, panicking on values outside `0..3`.
    ///
    /// Only used with indices produced by [`Action::index`] or bounded ranges.
    pub(crate) fn from_index(index: usize) -> Self {
        Self::ALL[index]
    }
}

impl TryFrom<u8> for Action {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(Error::InvalidAction {
                value: u32::from(value),
            })
    }
}

impl From<Action> for u8 {
    fn from(action: Action) -> Self {
        action as u8
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Stay => "stay",
        };
        f.write_str(label)
    }
}

/// Which paddle an agent controls.
///
/// Paddle 1 defends the left boundary, paddle 2 the right one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaddleId {
    Left,
    Right,
}

impl PaddleId {
    pub const BOTH: [PaddleId; 2] = [PaddleId::Left, PaddleId::Right];

    /// The paddle on the other side of the arena.
    pub fn opponent(self) -> Self {
        match self {
            PaddleId::Left => PaddleId::Right,
            PaddleId::Right => PaddleId::Left,
        }
    }

    /// Zero-based slot used to index per-paddle arrays.
    pub fn slot(self) -> usize {
        match self {
            PaddleId::Left => 0,
            PaddleId::Right => 1,
        }
    }

    /// One-based player number, as shown to operators.
    pub fn number(self) -> u8 {
        self.slot() as u8 + 1
    }
}

impl fmt::Display for PaddleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent {}", self.number())
    }
}

/// Position of a coordinate within one third of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Third {
    Low = 0,
    Middle = 1,
    High = 2,
}

impl Third {
    const ALL: [Third; 3] = [Third::Low, Third::Middle, Third::High];

    /// Bucket `value` into thirds of `extent`.
    pub fn of(value: f64, extent: f64) -> Self {
        if value < extent / 3.0 {
            Third::Low
        } else if value < 2.0 * extent / 3.0 {
            Third::Middle
        } else {
            Third::High
        }
    }
}

/// Sign of a velocity component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    Positive = 0,
    NonPositive = 1,
}

impl Sign {
    const ALL: [Sign; 2] = [Sign::Positive, Sign::NonPositive];

    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Sign::Positive
        } else {
            Sign::NonPositive
        }
    }
}

/// Vertical position of the ball relative to a paddle's reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    /// Ball is above the paddle's aligned band (smaller y).
    Above = 0,
    Aligned = 1,
    /// Ball is below the paddle's aligned band (larger y).
    Below = 2,
}

impl Alignment {
    const ALL: [Alignment; 3] = [Alignment::Above, Alignment::Aligned, Alignment::Below];

    /// Classify `offset` (ball y minus paddle center) against `half_band`.
    pub fn of(offset: f64, half_band: f64) -> Self {
        if offset < -half_band {
            Alignment::Above
        } else if offset > half_band {
            Alignment::Below
        } else {
            Alignment::Aligned
        }
    }
}

/// Decoded components of a [`DiscreteState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateFeatures {
    pub ball_x: Third,
    pub ball_y: Third,
    pub paddle_y: Third,
    pub ball_vel_x: Sign,
    pub ball_vel_y: Sign,
    pub relative: Alignment,
}

/// Integer id of a discretized observation, always in `0..NUM_STATES`.
///
/// Encoded as `bx + by*3 + pb*9 + vx*27 + vy*54 + rel*108`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u16", into = "u16")]
pub struct DiscreteState(u16);

impl DiscreteState {
    pub fn from_features(features: StateFeatures) -> Self {
        let id = features.ball_x as u16
            + features.ball_y as u16 * 3
            + features.paddle_y as u16 * 9
            + features.ball_vel_x as u16 * 27
            + features.ball_vel_y as u16 * 54
            + features.relative as u16 * 108;
        DiscreteState(id)
    }

    pub fn features(self) -> StateFeatures {
        let id = self.0 as usize;
        StateFeatures {
            ball_x: Third::ALL[id % 3],
            ball_y: Third::ALL[(id / 3) % 3],
            paddle_y: Third::ALL[(id / 9) % 3],
            ball_vel_x: Sign::ALL[(id / 27) % 2],
            ball_vel_y: Sign::ALL[(id / 54) % 2],
            relative: Alignment::ALL[id / 108],
        }
    }

    /// Get the inner value.
    pub fn value(self) -> u16 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate every state id in ascending order.
    pub fn all() -> impl Iterator<Item = DiscreteState> {
        (0..NUM_STATES as u16).map(DiscreteState)
    }
}

impl TryFrom<u16> for DiscreteState {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        if (value as usize) < NUM_STATES {
            Ok(DiscreteState(value))
        } else {
            Err(Error::InvalidStateId {
                value: u32::from(value),
                limit: NUM_STATES as u32,
            })
        }
    }
}

impl From<DiscreteState> for u16 {
    fn from(state: DiscreteState) -> Self {
        state.0
    }
}

impl fmt::Display for DiscreteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_mixed_radix_weights() {
        let features = StateFeatures {
            ball_x: Third::High,
            ball_y: Third::Middle,
            paddle_y: Third::Low,
            ball_vel_x: Sign::NonPositive,
            ball_vel_y: Sign::Positive,
            relative: Alignment::Below,
        };
        // 2 + 1*3 + 0*9 + 1*27 + 0*54 + 2*108
        assert_eq!(DiscreteState::from_features(features).value(), 248);
    }

    #[test]
    fn test_encoding_is_bijective() {
        let mut seen = HashSet::new();
        for state in DiscreteState::all() {
            let features = state.features();
            assert_eq!(DiscreteState::from_features(features), state);
            assert!(seen.insert(features));
        }
        assert_eq!(seen.len(), NUM_STATES);
    }

    #[test]
    fn test_state_id_range_checked() {
        assert!(DiscreteState::try_from(323).is_ok());
        assert!(matches!(
            DiscreteState::try_from(324),
            Err(Error::InvalidStateId { value: 324, .. })
        ));
    }

    #[test]
    fn test_action_codes() {
        for action in Action::ALL {
            assert_eq!(Action::try_from(u8::from(action)).unwrap(), action);
        }
        assert!(Action::try_from(3).is_err());
        assert_eq!(Action::Stay.index(), 2);
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(Third::of(0.0, 480.0), Third::Low);
        assert_eq!(Third::of(160.0, 480.0), Third::Middle);
        assert_eq!(Third::of(320.0, 480.0), Third::High);
        assert_eq!(Third::of(-25.0, 480.0), Third::Low);
        assert_eq!(Sign::of(0.0), Sign::NonPositive);
        assert_eq!(Alignment::of(40.0, 40.0), Alignment::Aligned);
        assert_eq!(Alignment::of(-40.5, 40.0), Alignment::Above);
    }
}
