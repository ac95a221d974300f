use ode_client::CloudApi;
use ode_core::error::OdeResult;
use tracing::debug;

use crate::manager::OdeManager;

/// Execute the list command
pub async fn execute<A: CloudApi>(manager: &OdeManager<A>) -> OdeResult<()> {
    let odes = manager.list().await?;
    debug!("Found {} on-demand environment(s)", odes.len());
    Ok(())
}
