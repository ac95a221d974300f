use ode_client::CloudApi;
use ode_core::{config::PipelineEvent, error::OdeResult};
use tracing::debug;

use crate::manager::OdeManager;

/// Execute the run command: dispatch on the pipeline event
pub async fn execute<A: CloudApi>(manager: &OdeManager<A>, event: Option<String>) -> OdeResult<()> {
    let event = match event {
        Some(name) => PipelineEvent::parse(Some(&name)),
        None => manager.context().event.clone(),
    };
    debug!("Dispatching pipeline event '{}'", event);
    manager.execute_event(&event).await
}
