//! ODE pipeline tool.
//!
//! Reacts to pipeline events by creating, reporting, or deleting the
//! on-demand cloud environment tied to the branch being deployed.

pub use ode_core as core;
pub use ode_client as client;
pub use ode_cli as cli;

/// Version of the ODE tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
