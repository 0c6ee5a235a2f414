//! Self-play tabular Q-learning for a two-paddle ball game
//!
//! This crate provides:
//! - A deterministic-given-RNG paddle/ball simulation with shaped rewards
//! - A six-feature state discretizer mapping each agent's view to one of 324 ids
//! - Sparse Q-tables, ε-greedy agents and the coupled exploration schedule
//! - A tick-driven training session with pluggable observers
//! - JSON persistence of Q-tables compatible with existing table files

pub mod adapters;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod pong;
pub mod ports;
pub mod q_learning;
pub mod types;

pub use error::{Error, Result};
pub use types::{Action, DiscreteState, PaddleId};
