//! Q-learning agent controlling one paddle

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::QTableRepository,
    q_learning::q_table::QTable,
    types::{Action, DiscreteState, PaddleId},
};

/// Step sizes of the one-step Q-learning update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningParams {
    /// α parameter, in (0, 1]
    pub learning_rate: f64,
    /// γ parameter, in [0, 1]
    pub discount_factor: f64,
}

impl Default for LearningParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.9,
        }
    }
}

impl LearningParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::InvalidConfiguration {
                message: format!("learning rate {} must be in (0, 1]", self.learning_rate),
            });
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(Error::InvalidConfiguration {
                message: format!("discount factor {} must be in [0, 1]", self.discount_factor),
            });
        }
        Ok(())
    }
}

/// Stepwise ε decay shared by both agents
///
/// Every `interval` episodes both agents lose `decrement` of exploration,
/// floored at `min_epsilon`. Decay only happens while *both* agents are
/// above the floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorationSchedule {
    pub initial_epsilon: f64,
    pub decrement: f64,
    pub min_epsilon: f64,
    /// Episodes between decay checks
    pub interval: u64,
}

impl Default for ExplorationSchedule {
    fn default() -> Self {
        Self {
            initial_epsilon: 0.1,
            decrement: 0.001,
            min_epsilon: 0.01,
            interval: 100,
        }
    }
}

impl ExplorationSchedule {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("initial epsilon", self.initial_epsilon),
            ("epsilon decrement", self.decrement),
            ("minimum epsilon", self.min_epsilon),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfiguration {
                    message: format!("{name} {value} must be in [0, 1]"),
                });
            }
        }
        if self.min_epsilon > self.initial_epsilon {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "minimum epsilon {} exceeds initial epsilon {}",
                    self.min_epsilon, self.initial_epsilon
                ),
            });
        }
        if self.interval == 0 {
            return Err(Error::InvalidConfiguration {
                message: "epsilon decay interval must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Whether finishing `episode` triggers a decay check
    pub fn should_decay(&self, episode: u64) -> bool {
        episode > 0 && episode.is_multiple_of(self.interval)
    }

    /// Decay both agents together; returns whether a decrement was applied
    pub fn decay_coupled(&self, first: &mut Agent, second: &mut Agent) -> bool {
        if first.epsilon <= self.min_epsilon || second.epsilon <= self.min_epsilon {
            return false;
        }
        for agent in [first, second] {
            agent.epsilon = (agent.epsilon - self.decrement).max(self.min_epsilon);
        }
        true
    }
}

/// How an action was picked by [`Agent::decide`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// ε-branch: uniformly random action
    Explore(Action),
    /// Greedy action from a visited state
    Exploit(Action),
    /// Greedy branch on a state with no stored values: uniformly random
    Unvisited(Action),
}

impl Decision {
    pub fn action(self) -> Action {
        match self {
            Decision::Explore(action) | Decision::Exploit(action) | Decision::Unvisited(action) => {
                action
            }
        }
    }
}

fn random_action<R: Rng + ?Sized>(rng: &mut R) -> Action {
    Action::from_index(rng.random_range(0..Action::ALL.len()))
}

/// Tabular Q-learning agent (off-policy TD control)
///
/// Owns its paddle's Q-table; tables are never shared between agents.
/// Randomness comes from the caller so both agents draw from the single
/// session RNG.
#[derive(Debug, Clone)]
pub struct Agent {
    paddle: PaddleId,
    q_table: QTable,
    params: LearningParams,
    epsilon: f64,
}

impl Agent {
    /// Create an agent with an empty table
    pub fn new(paddle: PaddleId, params: LearningParams, epsilon: f64) -> Self {
        Self::with_table(paddle, params, epsilon, QTable::new())
    }

    pub fn with_table(
        paddle: PaddleId,
        params: LearningParams,
        epsilon: f64,
        q_table: QTable,
    ) -> Self {
        Self {
            paddle,
            q_table,
            params,
            epsilon,
        }
    }

    pub fn paddle(&self) -> PaddleId {
        self.paddle
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn params(&self) -> LearningParams {
        self.params
    }

    /// Current exploration rate
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    /// ε-greedy choice, reporting which branch produced the action
    pub fn decide<R: Rng + ?Sized>(&self, state: DiscreteState, rng: &mut R) -> Decision {
        if rng.random::<f64>() < self.epsilon {
            return Decision::Explore(random_action(rng));
        }
        match self.q_table.greedy_action(state) {
            Some(action) => Decision::Exploit(action),
            None => Decision::Unvisited(random_action(rng)),
        }
    }

    /// ε-greedy action selection
    pub fn select_action<R: Rng + ?Sized>(&self, state: DiscreteState, rng: &mut R) -> Action {
        self.decide(state, rng).action()
    }

    /// One-step Q-learning update; returns the new Q(s,a)
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// An unvisited successor contributes 0.0 rather than -∞.
    pub fn update_q_value(
        &mut self,
        state: DiscreteState,
        action: Action,
        reward: f64,
        next_state: DiscreteState,
    ) -> f64 {
        let max_next_q = self.q_table.max_q(next_state).unwrap_or(0.0);
        let current_q = self.q_table.get(state, action);
        let td_target = reward + self.params.discount_factor * max_next_q;
        let new_q = current_q + self.params.learning_rate * (td_target - current_q);
        self.q_table.set(state, action, new_q);
        new_q
    }

    /// Replace the table with the one stored at `path`
    ///
    /// A missing file keeps the current table and is not an error. A file
    /// that cannot be decoded is, and leaves the current table untouched.
    pub fn load_table(&mut self, repository: &dyn QTableRepository, path: &Path) -> Result<()> {
        match repository.load(path)? {
            Some(table) => {
                log::info!(
                    "Q-table for {} loaded from {} ({} entries)",
                    self.paddle,
                    path.display(),
                    table.len()
                );
                self.q_table = table;
            }
            None => {
                log::info!(
                    "Q-table file {} not found for {}, starting with an empty Q-table",
                    path.display(),
                    self.paddle
                );
            }
        }
        Ok(())
    }

    /// Overwrite `path` with the current table
    pub fn save_table(&self, repository: &dyn QTableRepository, path: &Path) -> Result<()> {
        repository.save(&self.q_table, path)?;
        log::info!(
            "Q-table for {} saved to {} ({} entries)",
            self.paddle,
            path.display(),
            self.q_table.len()
        );
        Ok(())
    }
}
