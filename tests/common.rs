//! Common test utilities for the pong-rl test suite.

#![allow(dead_code)]

use pong_rl::{
    pipeline::{TrainingConfig, TrainingSession},
    pong::Ball,
};

/// Session with default parameters and a fixed seed.
pub fn seeded_session(seed: u64) -> TrainingSession {
    TrainingSession::new(&TrainingConfig::default().with_seed(seed))
        .expect("default config is valid")
}

/// Place the ball where the next tick carries it past the left boundary
/// without touching either paddle.
pub fn serve_into_left_goal(session: &mut TrainingSession) {
    let y = session.arena().height / 2.0;
    session.state_mut().ball = Ball {
        x: 12.0,
        y,
        vx: -5.0,
        vy: 0.0,
    };
}

/// Place the ball moving slowly through open space so the next tick has no
/// contact and no point.
pub fn park_ball_mid_field(session: &mut TrainingSession) {
    let arena = session.arena().clone();
    session.state_mut().ball = Ball {
        x: arena.width / 2.0,
        y: arena.height / 2.0,
        vx: 1.0,
        vy: 0.0,
    };
}
