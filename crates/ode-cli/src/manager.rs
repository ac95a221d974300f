//! Pipeline event dispatcher.

use tracing::{debug, info};

use ode_client::{poll_until, CloudApi, PollConfig};
use ode_core::config::{BuildContext, OdeConfig, PipelineEvent};
use ode_core::environment::{find_ode, odes_on_path, Environment};
use ode_core::error::{OdeError, OdeResult};

use crate::output;

/// What a deploy run ended up doing
#[derive(Debug, Clone, PartialEq)]
pub enum DeployOutcome {
    /// An ODE for the deploy path already existed
    Updated(Environment),
    /// A new ODE was created, became ready, and was switched to the deploy path
    Created(Environment),
}

/// Reacts to pipeline events by managing the ODE for the deploy path
pub struct OdeManager<A> {
    api: A,
    context: BuildContext,
    default_branch: String,
    poll: PollConfig,
}

impl<A: CloudApi> OdeManager<A> {
    pub fn new(api: A, context: BuildContext, config: &OdeConfig) -> Self {
        Self {
            api,
            context,
            default_branch: config.default_branch.clone(),
            poll: PollConfig::from(config),
        }
    }

    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Dispatch on the event captured in the build context
    pub async fn execute(&self) -> OdeResult<()> {
        let event = self.context.event.clone();
        self.execute_event(&event).await
    }

    pub async fn execute_event(&self, event: &PipelineEvent) -> OdeResult<()> {
        match event {
            PipelineEvent::Build => self.deploy().await.map(|_| ()),
            PipelineEvent::Merge => self.delete().await.map(|_| ()),
            PipelineEvent::Other(name) => {
                info!("Ignoring pipeline event '{}'", name);
                Ok(())
            }
        }
    }

    /// Create the ODE for the deploy path, or report the existing one.
    ///
    /// The label is the only link between a build and its environment.
    pub async fn deploy(&self) -> OdeResult<DeployOutcome> {
        let label = self.context.deploy_path.as_str();

        if let Some(env) = self.find_by_label(label).await? {
            // TODO: wait for the pushed build once the API exposes deploy tasks
            println!("Updating Cloud environment {}.", output::format_environment(&env));
            return Ok(DeployOutcome::Updated(env));
        }

        println!("Creating Cloud environment...");
        self.api
            .create_environment(&self.context.application_id, label, &self.default_branch)
            .await?;

        // Creation returns no id, so find it again via the label
        let env = self
            .find_by_label(label)
            .await?
            .ok_or_else(|| OdeError::EnvironmentNotFound(label.to_string()))?;

        println!(
            "Waiting for environment {} to be ready...",
            output::format_environment(&env)
        );
        let env = poll_until(&self.api, &env.id, &self.poll, |env, count| {
            println!("{}", output::format_tick(count, &env.status));
            env.is_ready()
        })
        .await?;

        // The branch may not exist yet on the remote; the switch is requested anyway
        self.api.switch_code(&env.id, label).await?;
        info!("Requested switch of {} to {}", env.name, label);

        Ok(DeployOutcome::Created(env))
    }

    /// Delete every ODE deploying the deploy path. Returns how many were deleted.
    pub async fn delete(&self) -> OdeResult<usize> {
        let envs = self.environments().await?;
        let mut deleted = 0;

        for env in odes_on_path(&envs, &self.context.deploy_path) {
            println!("Deleting environment {}.", output::format_environment(env));
            self.api.delete_environment(&env.id).await?;
            deleted += 1;
        }

        debug!("Deleted {} environment(s) for {}", deleted, self.context.deploy_path);
        Ok(deleted)
    }

    /// Print the application's ODEs, marking the ones tied to the deploy path
    pub async fn list(&self) -> OdeResult<Vec<Environment>> {
        let path = self.context.deploy_path.as_str();
        let odes: Vec<Environment> = self
            .environments()
            .await?
            .into_iter()
            .filter(Environment::is_ode)
            .collect();

        println!("On-demand environments for {}:", self.context.application_id);
        for env in &odes {
            let current = env.label == path || env.vcs_path() == Some(path);
            println!("{}", output::format_listing(env, current));
        }

        Ok(odes)
    }

    async fn environments(&self) -> OdeResult<Vec<Environment>> {
        let envs = self.api.list_environments(&self.context.application_id).await?;
        debug!("Application {} has {} environment(s)", self.context.application_id, envs.len());
        Ok(envs)
    }

    async fn find_by_label(&self, label: &str) -> OdeResult<Option<Environment>> {
        let envs = self.environments().await?;
        Ok(find_ode(&envs, |env| env.label == label).cloned())
    }
}
