use async_trait::async_trait;

use ode_core::environment::Environment;
use ode_core::error::OdeResult;

/// Operations the pipeline tool needs from the cloud API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CloudApi: Send + Sync {
    /// `GET applications/{app}/environments`
    async fn list_environments(&self, application_id: &str) -> OdeResult<Vec<Environment>>;

    /// `POST applications/{app}/environments`. The response carries no
    /// environment id, so callers re-list to find the new environment.
    async fn create_environment(
        &self,
        application_id: &str,
        label: &str,
        branch: &str,
    ) -> OdeResult<()>;

    /// `GET environments/{id}`
    async fn get_environment(&self, environment_id: &str) -> OdeResult<Environment>;

    /// `POST environments/{id}/code/actions/switch`
    async fn switch_code(&self, environment_id: &str, branch: &str) -> OdeResult<()>;

    /// `DELETE environments/{id}`
    async fn delete_environment(&self, environment_id: &str) -> OdeResult<()>;
}
