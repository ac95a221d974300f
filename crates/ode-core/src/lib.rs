//! Core types for the ODE pipeline tool.
//!
//! This crate holds the environment model, the build context captured from
//! the pipeline, tool configuration, and the shared error type.

pub mod config;
pub mod environment;
pub mod error;

// Re-export commonly used types
pub use crate::config::{BuildContext, Credentials, OdeConfig, PipelineEvent};
pub use crate::environment::{find_ode, odes_on_path, Environment, EnvironmentList, STATUS_NORMAL};
pub use crate::error::{OdeError, OdeResult};
