//! CLI infrastructure for the pong-rl trainer
//!
//! This module provides the command-line interface for running self-play
//! training and for looking inside the Q-tables it produces.

pub mod commands;
pub mod output;
