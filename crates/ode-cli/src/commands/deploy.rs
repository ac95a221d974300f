use ode_client::CloudApi;
use ode_core::error::OdeResult;
use tracing::info;

use crate::manager::{DeployOutcome, OdeManager};

/// Execute the deploy command
pub async fn execute<A: CloudApi>(manager: &OdeManager<A>) -> OdeResult<()> {
    match manager.deploy().await? {
        DeployOutcome::Updated(env) => info!("Environment {} already exists", env.name),
        DeployOutcome::Created(env) => info!("Environment {} created and ready", env.name),
    }
    Ok(())
}
