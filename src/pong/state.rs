//! Continuous simulation state

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arena::ArenaConfig;
use crate::types::PaddleId;

/// Ball center and velocity, in arena units per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

/// Everything that moves during a match.
///
/// Owned by the training session and mutated once per tick. Points reset the
/// ball but never the scores or the episode counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub ball: Ball,
    /// Top edge of each paddle, indexed by [`PaddleId::slot`]
    pub paddle_y: [f64; 2],
    /// Points won, indexed by [`PaddleId::slot`]
    pub scores: [u32; 2],
    /// Number of points played so far
    pub episode: u64,
}

impl SimulationState {
    /// Kick-off position: ball centered moving down-right, paddles centered.
    pub fn new(arena: &ArenaConfig) -> Self {
        Self {
            ball: Ball {
                x: arena.width / 2.0,
                y: arena.height / 2.0,
                vx: arena.ball_speed_x,
                vy: arena.ball_speed_y,
            },
            paddle_y: [arena.centered_paddle_y(); 2],
            scores: [0, 0],
            episode: 0,
        }
    }

    pub fn paddle_y(&self, paddle: PaddleId) -> f64 {
        self.paddle_y[paddle.slot()]
    }

    /// Vertical center of a paddle.
    pub fn paddle_center(&self, paddle: PaddleId, arena: &ArenaConfig) -> f64 {
        self.paddle_y(paddle) + arena.paddle_height / 2.0
    }

    pub fn score(&self, paddle: PaddleId) -> u32 {
        self.scores[paddle.slot()]
    }

    /// Serve again after a point.
    ///
    /// Recenters the ball, reverses its horizontal direction, draws a new
    /// vertical velocity uniformly from `[-ball_speed_y, ball_speed_y)` and
    /// counts the finished episode.
    pub fn reset_ball<R: Rng + ?Sized>(&mut self, arena: &ArenaConfig, rng: &mut R) {
        self.episode += 1;
        self.ball.x = arena.width / 2.0;
        self.ball.y = arena.height / 2.0;
        self.ball.vx = -self.ball.vx;
        self.ball.vy = arena.ball_speed_y * (rng.random::<f64>() * 2.0 - 1.0);
    }
}
