//! Tabular Q-learning
//!
//! Each paddle is driven by its own [`Agent`], which owns a [`QTable`] and
//! learns online from the rewards the physics step hands out.
//!
//! ## Update rule
//!
//! Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
//!
//! Missing (state, action) pairs read as 0.0, and an unvisited successor
//! state contributes 0.0 to the target.
//!
//! ## Usage Example
//!
//! ```
//! use pong_rl::q_learning::{Agent, LearningParams};
//! use pong_rl::types::{Action, DiscreteState, PaddleId};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut agent = Agent::new(PaddleId::Left, LearningParams::default(), 0.1);
//!
//! let state = DiscreteState::try_from(121)?;
//! let next = DiscreteState::try_from(122)?;
//! let action = agent.select_action(state, &mut rng);
//! agent.update_q_value(state, action, 0.1, next);
//! assert!(agent.q_table().is_visited(state));
//! # Ok::<(), pong_rl::Error>(())
//! ```

pub mod agent;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use agent::{Agent, Decision, ExplorationSchedule, LearningParams};
pub use q_table::QTable;
pub use serialization::TableDocument;
