use std::time::Duration;

use tracing::debug;

use ode_core::config::OdeConfig;
use ode_core::environment::Environment;
use ode_core::error::{OdeError, OdeResult};

use crate::api::CloudApi;

/// How often and how long to poll an environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::from(&OdeConfig::default())
    }
}

impl From<&OdeConfig> for PollConfig {
    fn from(config: &OdeConfig) -> Self {
        Self {
            interval: config.poll_interval(),
            max_attempts: config.max_poll_attempts,
        }
    }
}

/// Re-fetch an environment until `done` returns true.
///
/// One status call per tick; `done` receives the fresh environment and the
/// attempt number, starting at 1. API errors end the poll immediately.
pub async fn poll_until<A, F>(
    api: &A,
    environment_id: &str,
    config: &PollConfig,
    mut done: F,
) -> OdeResult<Environment>
where
    A: CloudApi + ?Sized,
    F: FnMut(&Environment, u32) -> bool,
{
    let mut last_status = String::new();

    for attempt in 1..=config.max_attempts {
        let env = api.get_environment(environment_id).await?;
        if done(&env, attempt) {
            debug!("Environment {} settled after {} attempt(s)", environment_id, attempt);
            return Ok(env);
        }
        last_status = env.status;

        if attempt < config.max_attempts {
            tokio::time::sleep(config.interval).await;
        }
    }

    Err(OdeError::PollTimeout {
        attempts: config.max_attempts,
        last_status,
    })
}
