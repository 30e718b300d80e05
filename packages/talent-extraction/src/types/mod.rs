//! Data types shared by the classifier, adapters and orchestrator.

pub mod config;
pub mod platform;
pub mod records;
pub mod status;
pub mod task;
