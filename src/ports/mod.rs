//! Ports (trait boundaries) for external collaborators.
//!
//! The training core owns these traits; renderers, loggers and storage
//! backends implement them as adapters.

pub mod observer;
pub mod repository;

pub use observer::TrainingObserver;
pub use repository::QTableRepository;
