//! Physics step and reward shaping

use std::ops::Index;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{arena::ArenaConfig, state::SimulationState};
use crate::{
    Error, Result,
    types::{Action, PaddleId},
};

/// Largest reward magnitude a schedule may use.
///
/// Keeps every reachable Q-value far from overflowing to infinity.
pub const MAX_REWARD_MAGNITUDE: f64 = 1e6;

/// Reward values produced by game events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardSchedule {
    /// Paid to the agent whose paddle touched the ball
    pub contact: f64,
    /// Paid to the other agent on a contact
    pub opponent_contact: f64,
    pub point_won: f64,
    pub point_lost: f64,
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self {
            contact: 0.1,
            opponent_contact: -0.01,
            point_won: 1.0,
            point_lost: -1.0,
        }
    }
}

impl RewardSchedule {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("contact", self.contact),
            ("opponent_contact", self.opponent_contact),
            ("point_won", self.point_won),
            ("point_lost", self.point_lost),
        ] {
            if !(value.is_finite() && value.abs() <= MAX_REWARD_MAGNITUDE) {
                return Err(Error::InvalidConfiguration {
                    message: format!(
                        "{name} reward {value} must be finite and at most {MAX_REWARD_MAGNITUDE:e} in magnitude"
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Per-agent reward accumulated during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rewards([f64; 2]);

impl Rewards {
    pub fn add(&mut self, paddle: PaddleId, amount: f64) {
        self.0[paddle.slot()] += amount;
    }

    pub fn get(&self, paddle: PaddleId) -> f64 {
        self.0[paddle.slot()]
    }
}

impl Index<PaddleId> for Rewards {
    type Output = f64;

    fn index(&self, paddle: PaddleId) -> &f64 {
        &self.0[paddle.slot()]
    }
}

/// What happened during one physics step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub rewards: Rewards,
    /// Paddles that touched the ball this tick, in paddle order
    pub contacts: Vec<PaddleId>,
    /// Paddle that won a point this tick
    pub scorer: Option<PaddleId>,
}

/// Move a paddle by one command, keeping it inside `[0, height - paddle_height]`.
pub fn apply_action(
    state: &mut SimulationState,
    arena: &ArenaConfig,
    paddle: PaddleId,
    action: Action,
) {
    let y = &mut state.paddle_y[paddle.slot()];
    match action {
        Action::Up => *y = (*y - arena.paddle_speed).max(0.0),
        Action::Down => *y = (*y + arena.paddle_speed).min(arena.max_paddle_y()),
        Action::Stay => {}
    }
}

/// Advance the ball one tick and collect rewards.
///
/// Order: move the ball, bounce off the top/bottom walls, resolve paddle
/// contacts, then check the side boundaries. Contact and scoring rewards
/// accumulate, so one tick may carry both.
pub fn step<R: Rng + ?Sized>(
    state: &mut SimulationState,
    arena: &ArenaConfig,
    schedule: &RewardSchedule,
    rng: &mut R,
) -> StepOutcome {
    let mut outcome = StepOutcome::default();

    state.ball.x += state.ball.vx;
    state.ball.y += state.ball.vy;

    let ball = arena.ball_rect(state.ball.x, state.ball.y);

    if ball.min_y < 0.0 || ball.max_y > arena.height {
        state.ball.vy = -state.ball.vy;
    }

    for paddle in PaddleId::BOTH {
        let rect = arena.paddle_rect(paddle, state.paddle_y(paddle));
        if rect.intersects(&ball) {
            state.ball.vx = -state.ball.vx;
            outcome.rewards.add(paddle, schedule.contact);
            outcome
                .rewards
                .add(paddle.opponent(), schedule.opponent_contact);
            outcome.contacts.push(paddle);
        }
    }

    let scorer = if ball.min_x < 0.0 {
        Some(PaddleId::Right)
    } else if ball.min_x > arena.width {
        Some(PaddleId::Left)
    } else {
        None
    };

    if let Some(scorer) = scorer {
        state.scores[scorer.slot()] += 1;
        outcome.rewards.add(scorer, schedule.point_won);
        outcome.rewards.add(scorer.opponent(), schedule.point_lost);
        state.reset_ball(arena, rng);
        outcome.scorer = Some(scorer);
    }

    outcome
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::pong::state::Ball;

    fn setup() -> (ArenaConfig, SimulationState, StdRng) {
        let arena = ArenaConfig::default();
        let state = SimulationState::new(&arena);
        (arena, state, StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_paddle_clamped_to_arena() {
        let (arena, mut state, _) = setup();
        for _ in 0..20 {
            apply_action(&mut state, &arena, PaddleId::Left, Action::Up);
            assert!(state.paddle_y(PaddleId::Left) >= 0.0);
        }
        assert_eq!(state.paddle_y(PaddleId::Left), 0.0);

        for _ in 0..20 {
            apply_action(&mut state, &arena, PaddleId::Right, Action::Down);
            assert!(state.paddle_y(PaddleId::Right) <= arena.max_paddle_y());
        }
        assert_eq!(state.paddle_y(PaddleId::Right), 400.0);

        apply_action(&mut state, &arena, PaddleId::Right, Action::Stay);
        assert_eq!(state.paddle_y(PaddleId::Right), 400.0);
    }

    #[test]
    fn test_left_boundary_scores_for_right_player() {
        let (arena, mut state, mut rng) = setup();
        state.ball = Ball {
            x: 12.0,
            y: 240.0,
            vx: -5.0,
            vy: 0.0,
        };

        let outcome = step(&mut state, &arena, &RewardSchedule::default(), &mut rng);

        assert_eq!(outcome.scorer, Some(PaddleId::Right));
        assert!(outcome.contacts.is_empty());
        assert_eq!(state.scores, [0, 1]);
        assert_eq!(outcome.rewards[PaddleId::Left], -1.0);
        assert_eq!(outcome.rewards[PaddleId::Right], 1.0);
        assert_eq!((state.ball.x, state.ball.y), (320.0, 240.0));
        assert_eq!(state.ball.vx, 5.0);
        assert_eq!(state.episode, 1);
    }

    #[test]
    fn test_right_boundary_requires_ball_fully_out() {
        let (arena, mut state, mut rng) = setup();
        state.ball = Ball {
            x: 640.0,
            y: 100.0,
            vx: 5.0,
            vy: 0.0,
        };
        let outcome = step(&mut state, &arena, &RewardSchedule::default(), &mut rng);
        assert_eq!(outcome.scorer, None);

        state.ball.vx = 10.0;
        let outcome = step(&mut state, &arena, &RewardSchedule::default(), &mut rng);
        assert_eq!(outcome.scorer, Some(PaddleId::Left));
        assert_eq!(state.scores, [1, 0]);
        assert_eq!(outcome.rewards[PaddleId::Left], 1.0);
        assert_eq!(outcome.rewards[PaddleId::Right], -1.0);
    }

    #[test]
    fn test_touching_paddle_is_not_contact() {
        let (arena, mut state, mut rng) = setup();
        // After the move the ball's left edge sits exactly on the left
        // paddle's right edge (x = 70).
        state.ball = Ball {
            x: 85.0,
            y: 240.0,
            vx: -5.0,
            vy: 0.0,
        };

        let outcome = step(&mut state, &arena, &RewardSchedule::default(), &mut rng);

        assert!(outcome.contacts.is_empty());
        assert_eq!(state.ball.vx, -5.0);
        assert_eq!(outcome.rewards, Rewards::default());
    }

    #[test]
    fn test_overlapping_paddle_reflects_and_rewards() {
        let (arena, mut state, mut rng) = setup();
        state.ball = Ball {
            x: 84.0,
            y: 240.0,
            vx: -5.0,
            vy: 0.0,
        };

        let outcome = step(&mut state, &arena, &RewardSchedule::default(), &mut rng);

        assert_eq!(outcome.contacts, vec![PaddleId::Left]);
        assert_eq!(state.ball.vx, 5.0);
        assert_eq!(outcome.rewards[PaddleId::Left], 0.1);
        assert_eq!(outcome.rewards[PaddleId::Right], -0.01);
        assert_eq!(outcome.scorer, None);
    }

    #[test]
    fn test_wall_bounce_flips_vertical_velocity() {
        let (arena, mut state, mut rng) = setup();
        state.ball = Ball {
            x: 320.0,
            y: 15.0,
            vx: 5.0,
            vy: -10.0,
        };

        step(&mut state, &arena, &RewardSchedule::default(), &mut rng);
        assert_eq!(state.ball.y, 5.0);
        assert_eq!(state.ball.vy, 10.0);

        state.ball.y = 465.0;
        step(&mut state, &arena, &RewardSchedule::default(), &mut rng);
        assert_eq!(state.ball.vy, -10.0);
    }

    #[test]
    fn test_contact_and_point_rewards_add_up() {
        // With no inset the paddle touches the wall, so one tick can both
        // hit the paddle and leave through the left boundary.
        let arena = ArenaConfig {
            paddle_inset: 0.0,
            ..ArenaConfig::default()
        };
        assert!(arena.validate().is_ok());
        let mut state = SimulationState::new(&arena);
        let mut rng = StdRng::seed_from_u64(42);
        state.ball = Ball {
            x: 15.0,
            y: 240.0,
            vx: -10.0,
            vy: 0.0,
        };

        let outcome = step(&mut state, &arena, &RewardSchedule::default(), &mut rng);

        assert_eq!(outcome.contacts, vec![PaddleId::Left]);
        assert_eq!(outcome.scorer, Some(PaddleId::Right));
        assert!((outcome.rewards[PaddleId::Left] - -0.9).abs() < 1e-12);
        assert!((outcome.rewards[PaddleId::Right] - 0.99).abs() < 1e-12);
        // Reflected to +10 by the paddle, then reversed again by the serve
        assert_eq!(state.ball.vx, -10.0);
        assert_eq!((state.ball.x, state.ball.y), (320.0, 240.0));
        assert_eq!(state.scores, [0, 1]);
    }

    #[test]
    fn test_reward_schedule_validation() {
        assert!(RewardSchedule::default().validate().is_ok());
        for schedule in [
            RewardSchedule {
                point_won: 1e308,
                ..RewardSchedule::default()
            },
            RewardSchedule {
                contact: f64::NAN,
                ..RewardSchedule::default()
            },
            RewardSchedule {
                point_lost: f64::NEG_INFINITY,
                ..RewardSchedule::default()
            },
        ] {
            assert!(matches!(
                schedule.validate(),
                Err(Error::InvalidConfiguration { .. })
            ));
        }
    }

    #[test]
    fn test_custom_reward_schedule() {
        let (arena, mut state, mut rng) = setup();
        let schedule = RewardSchedule {
            point_won: 5.0,
            point_lost: -2.0,
            ..RewardSchedule::default()
        };
        state.ball = Ball {
            x: 12.0,
            y: 240.0,
            vx: -5.0,
            vy: 0.0,
        };

        let outcome = step(&mut state, &arena, &schedule, &mut rng);
        assert_eq!(outcome.rewards.get(PaddleId::Right), 5.0);
        assert_eq!(outcome.rewards.get(PaddleId::Left), -2.0);
    }
}
