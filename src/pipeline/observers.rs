//! Observer adapters for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! the tick loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};

use super::training::{FrameView, PointEvent, TickReport, TrainingResult};
use crate::{
    Result,
    cli::output::{create_tick_progress, create_tick_spinner},
    ports::TrainingObserver,
    types::PaddleId,
};

/// Ticks between progress bar refreshes
const PROGRESS_REFRESH_TICKS: u64 = 250;

/// Progress bar observer - Shows training progress
///
/// Draws a bar when the run has a tick budget and a spinner otherwise.
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self { progress_bar: None }
    }

    fn message(frame: &FrameView) -> String {
        format!(
            "{}-{} ep {} ε {:.3}/{:.3}",
            frame.scores[0], frame.scores[1], frame.episode, frame.epsilons[0], frame.epsilons[1]
        )
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingObserver for ProgressObserver {
    fn on_training_start(&mut self, max_ticks: Option<u64>) -> Result<()> {
        let pb = match max_ticks {
            Some(total) => create_tick_progress(total)?,
            None => create_tick_spinner()?,
        };
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_tick(&mut self, report: &TickReport, frame: &FrameView) -> Result<()> {
        let refresh = report.tick.is_multiple_of(PROGRESS_REFRESH_TICKS) || report.scorer.is_some();
        if let Some(pb) = &self.progress_bar {
            if refresh {
                pb.set_position(report.tick);
                pb.set_message(Self::message(frame));
            }
        }
        Ok(())
    }

    fn on_training_end(&mut self, result: &TrainingResult) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!(
                "{}-{} after {} points",
                result.scores[0], result.scores[1], result.points
            ));
        }
        Ok(())
    }
}

/// Metrics observer - Tracks rally and reward statistics
pub struct MetricsObserver {
    ticks: u64,
    points: [u64; 2],
    contacts: [u64; 2],
    cumulative_reward: [f64; 2],
    /// Ticks spent in finished points
    rally_ticks: u64,
    current_rally: u64,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self {
            ticks: 0,
            points: [0; 2],
            contacts: [0; 2],
            cumulative_reward: [0.0; 2],
            rally_ticks: 0,
            current_rally: 0,
        }
    }

    /// Average number of ticks per finished point
    pub fn avg_rally_length(&self) -> f64 {
        let finished = self.points[0] + self.points[1];
        if finished == 0 {
            0.0
        } else {
            self.rally_ticks as f64 / finished as f64
        }
    }

    /// Share of finished points won by `paddle`
    pub fn win_rate(&self, paddle: PaddleId) -> f64 {
        let total = self.points[0] + self.points[1];
        if total == 0 {
            0.0
        } else {
            self.points[paddle.slot()] as f64 / total as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            ticks: self.ticks,
            points: self.points,
            contacts: self.contacts,
            cumulative_reward: self.cumulative_reward,
            avg_rally_length: self.avg_rally_length(),
            win_rate: PaddleId::BOTH.map(|paddle| self.win_rate(paddle)),
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub ticks: u64,
    pub points: [u64; 2],
    pub contacts: [u64; 2],
    pub cumulative_reward: [f64; 2],
    pub avg_rally_length: f64,
    pub win_rate: [f64; 2],
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingObserver for MetricsObserver {
    fn on_tick(&mut self, report: &TickReport, _frame: &FrameView) -> Result<()> {
        self.ticks += 1;
        self.current_rally += 1;
        for paddle in PaddleId::BOTH {
            self.cumulative_reward[paddle.slot()] += report.rewards[paddle];
        }
        for paddle in &report.contacts {
            self.contacts[paddle.slot()] += 1;
        }
        Ok(())
    }

    fn on_point(&mut self, event: &PointEvent) -> Result<()> {
        self.points[event.scorer.slot()] += 1;
        self.rally_ticks += self.current_rally;
        self.current_rally = 0;
        Ok(())
    }
}

/// JSONL observer - Writes one JSON object per finished point
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl TrainingObserver for JsonlObserver {
    fn on_point(&mut self, event: &PointEvent) -> Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self, _result: &TrainingResult) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Shared observer - Delegates to an observer the caller keeps a handle on
///
/// The pipeline owns its observers, so wrap one in `Arc<Mutex<_>>` to read
/// its state after the run.
pub struct SharedObserver<O> {
    inner: Arc<Mutex<O>>,
}

impl<O: TrainingObserver> SharedObserver<O> {
    pub fn new(inner: Arc<Mutex<O>>) -> Self {
        Self { inner }
    }

    fn lock(&self) -> MutexGuard<'_, O> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<O: TrainingObserver> TrainingObserver for SharedObserver<O> {
    fn on_training_start(&mut self, max_ticks: Option<u64>) -> Result<()> {
        self.lock().on_training_start(max_ticks)
    }

    fn on_tick(&mut self, report: &TickReport, frame: &FrameView) -> Result<()> {
        self.lock().on_tick(report, frame)
    }

    fn on_point(&mut self, event: &PointEvent) -> Result<()> {
        self.lock().on_point(event)
    }

    fn on_exploration_decay(&mut self, episode: u64, epsilons: [f64; 2]) -> Result<()> {
        self.lock().on_exploration_decay(episode, epsilons)
    }

    fn on_training_end(&mut self, result: &TrainingResult) -> Result<()> {
        self.lock().on_training_end(result)
    }
}
