//! Training loop and its observation hooks
//!
//! This module provides:
//! - [`TrainingSession`]: the per-tick state machine coupling the simulation
//!   to both learning agents
//! - [`TrainingPipeline`]: the run loop that drives a session until stopped
//!   and notifies observers
//! - Observer adapters for progress display, metrics and JSONL export

pub mod observers;
pub mod training;

// Re-export observer implementations (adapters)
pub use observers::{
    JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver, SharedObserver,
};
pub use training::{
    FrameView, PointEvent, StopHandle, TickReport, TrainingConfig, TrainingPipeline,
    TrainingResult, TrainingSession, Transition,
};

pub use crate::ports::TrainingObserver;
