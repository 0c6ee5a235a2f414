//! Observer port - abstraction for watching a training run
//!
//! Renderers, progress displays and data exporters receive read-only views
//! of the session through this trait; the training loop never waits on them
//! beyond the call itself.

use crate::{
    Result,
    pipeline::{FrameView, PointEvent, TickReport, TrainingResult},
};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(max_ticks)` - Once at the beginning
/// 2. For each tick:
///    - `on_tick(report, frame)`
///    - `on_point(event)` - When the tick ended a point
///    - `on_exploration_decay(...)` - When the tick decayed ε
/// 3. `on_training_end(result)` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use pong_rl::{pipeline::PointEvent, ports::TrainingObserver};
///
/// struct PointCounter {
///     points: usize,
/// }
///
/// impl TrainingObserver for PointCounter {
///     fn on_point(&mut self, _event: &PointEvent) -> pong_rl::Result<()> {
///         self.points += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait TrainingObserver: Send {
    /// Called when training starts; `max_ticks` is `None` for open-ended runs.
    fn on_training_start(&mut self, _max_ticks: Option<u64>) -> Result<()> {
        Ok(())
    }

    /// Called once per tick, after learning updates were applied.
    fn on_tick(&mut self, _report: &TickReport, _frame: &FrameView) -> Result<()> {
        Ok(())
    }

    /// Called when a tick ended a point.
    fn on_point(&mut self, _event: &PointEvent) -> Result<()> {
        Ok(())
    }

    /// Called when both agents' exploration rates were decremented.
    fn on_exploration_decay(&mut self, _episode: u64, _epsilons: [f64; 2]) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    fn on_training_end(&mut self, _result: &TrainingResult) -> Result<()> {
        Ok(())
    }
}
