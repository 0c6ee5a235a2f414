//! Adapters implementing domain ports.
//!
//! Infrastructure implementations of the traits defined in the ports module.

pub mod in_memory_repository;
pub mod json_repository;

pub use in_memory_repository::InMemoryRepository;
pub use json_repository::JsonFileRepository;
