use ode_client::CloudApi;
use ode_core::error::OdeResult;
use tracing::info;

use crate::manager::OdeManager;

/// Execute the delete command
pub async fn execute<A: CloudApi>(manager: &OdeManager<A>) -> OdeResult<()> {
    let deleted = manager.delete().await?;
    if deleted == 0 {
        info!(
            "No on-demand environments deploy {}",
            manager.context().deploy_path
        );
    }
    Ok(())
}
