//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Sweeper: drops expired cache entries ahead of their next lookup

mod sweeper;

pub use sweeper::spawn_sweeper_task;
