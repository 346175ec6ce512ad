//! Core infrastructure - configuration and background task management

pub mod config;
pub mod tasks;

pub use config::FloorConfig;
pub use tasks::{BackgroundTasks, TaskKind};
