//! Discretization of the continuous state into a per-agent state id

use super::{arena::ArenaConfig, state::SimulationState};
use crate::types::{Alignment, DiscreteState, PaddleId, Sign, StateFeatures, Third};

/// Observation features for the agent controlling `paddle`.
pub fn features(state: &SimulationState, arena: &ArenaConfig, paddle: PaddleId) -> StateFeatures {
    let paddle_center = state.paddle_center(paddle, arena);
    StateFeatures {
        ball_x: Third::of(state.ball.x, arena.width),
        ball_y: Third::of(state.ball.y, arena.height),
        paddle_y: Third::of(paddle_center, arena.height),
        ball_vel_x: Sign::of(state.ball.vx),
        ball_vel_y: Sign::of(state.ball.vy),
        relative: Alignment::of(state.ball.y - paddle_center, arena.paddle_height / 2.0),
    }
}

/// Map the simulation state to the discrete state seen by `paddle`'s agent.
///
/// Pure: the result depends only on the ball position, the velocity signs
/// and the queried paddle's position.
pub fn discretize(state: &SimulationState, arena: &ArenaConfig, paddle: PaddleId) -> DiscreteState {
    DiscreteState::from_features(features(state, arena, paddle))
}
