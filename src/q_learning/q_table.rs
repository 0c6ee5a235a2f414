//! Q-table implementation for tabular Q-learning

use serde::{Deserialize, Serialize};

use super::serialization::TableDocument;
use crate::types::{Action, DiscreteState, NUM_ACTIONS, NUM_STATES};

/// Q-table mapping (state, action) pairs to Q-values
///
/// Backed by a flat array indexed by `state * NUM_ACTIONS + action`. Each
/// slot records whether the pair has ever been written, so a state with no
/// written slot is "unvisited" while missing pairs still read as `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableDocument", into = "TableDocument")]
pub struct QTable {
    values: Vec<Option<f64>>,
}

impl QTable {
    /// Create an empty Q-table
    pub fn new() -> Self {
        Self {
            values: vec![None; NUM_STATES * NUM_ACTIONS],
        }
    }

    fn slot(state: DiscreteState, action: Action) -> usize {
        state.index() * NUM_ACTIONS + action.index()
    }

    /// Stored value for a pair, if it was ever written
    pub fn entry(&self, state: DiscreteState, action: Action) -> Option<f64> {
        self.values[Self::slot(state, action)]
    }

    /// Get Q-value for a state-action pair (0.0 when never written)
    pub fn get(&self, state: DiscreteState, action: Action) -> f64 {
        self.entry(state, action).unwrap_or(0.0)
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: DiscreteState, action: Action, value: f64) {
        self.values[Self::slot(state, action)] = Some(value);
    }

    /// Whether any action of `state` has a stored value
    pub fn is_visited(&self, state: DiscreteState) -> bool {
        let start = state.index() * NUM_ACTIONS;
        self.values[start..start + NUM_ACTIONS]
            .iter()
            .any(Option::is_some)
    }

    /// Action values of a visited state, with unwritten actions read as 0.0
    pub fn row(&self, state: DiscreteState) -> Option<[f64; NUM_ACTIONS]> {
        if !self.is_visited(state) {
            return None;
        }
        Some(Action::ALL.map(|action| self.get(state, action)))
    }

    /// Maximum Q-value over all actions of a visited state
    pub fn max_q(&self, state: DiscreteState) -> Option<f64> {
        self.row(state)
            .map(|row| row.into_iter().fold(f64::NEG_INFINITY, f64::max))
    }

    /// Action with the strictly greatest Q-value in a visited state
    ///
    /// Ties resolve to the lowest action index: the scan only replaces the
    /// current best on a strictly greater value.
    pub fn greedy_action(&self, state: DiscreteState) -> Option<Action> {
        let row = self.row(state)?;
        let mut best = 0;
        for index in 1..NUM_ACTIONS {
            if row[index] > row[best] {
                best = index;
            }
        }
        Some(Action::from_index(best))
    }

    /// Iterate stored `(state, action, value)` entries in ascending order
    pub fn entries(&self) -> impl Iterator<Item = (DiscreteState, Action, f64)> + '_ {
        DiscreteState::all().flat_map(move |state| {
            Action::ALL
                .into_iter()
                .filter_map(move |action| self.entry(state, action).map(|v| (state, action, v)))
        })
    }

    /// Number of stored (state, action) entries
    pub fn len(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Number of states with at least one stored entry
    pub fn visited_states(&self) -> usize {
        DiscreteState::all()
            .filter(|&state| self.is_visited(state))
            .count()
    }

    /// Forget every stored value
    pub fn clear(&mut self) {
        self.values.iter_mut().for_each(|v| *v = None);
    }
}

impl Default for QTable {
    fn default() -> Self {
        Self::new()
    }
}
