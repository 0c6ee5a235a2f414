//! Ball-and-paddle simulation
//!
//! This module contains the continuous side of the testbed:
//! - Arena geometry and speeds ([`ArenaConfig`])
//! - The mutable [`SimulationState`] aggregate owned by the training loop
//! - The physics step that moves the ball and produces per-agent rewards
//! - The discretizer that maps the continuous state to a [`crate::types::DiscreteState`]

pub mod arena;
pub mod discretizer;
pub mod physics;
pub mod state;

pub use arena::{ArenaConfig, Rect};
pub use discretizer::discretize;
pub use physics::{RewardSchedule, Rewards, StepOutcome, apply_action, step};
pub use state::{Ball, SimulationState};
