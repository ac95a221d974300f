//! Cloud API client for the ODE pipeline tool.
//!
//! `CloudApi` is the seam the dispatcher talks through; `HttpCloudApi` is
//! the reqwest-backed implementation and `poll_until` waits on an
//! environment's status.

mod api;
mod http;
mod poll;

pub use api::CloudApi;
pub use http::HttpCloudApi;
pub use poll::{poll_until, PollConfig};

use ode_core::config::{Credentials, OdeConfig};
use ode_core::error::OdeResult;

/// Create an HTTP client from configuration and credentials
pub fn create_client(config: &OdeConfig, credentials: Credentials) -> OdeResult<HttpCloudApi> {
    config.validate()?;
    HttpCloudApi::new(config, credentials)
}
