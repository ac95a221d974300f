use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use ode_core::config::{Credentials, OdeConfig};
use ode_core::environment::{Environment, EnvironmentList};
use ode_core::error::{OdeError, OdeResult};

use crate::api::CloudApi;

/// Cloud API client over HTTP
#[derive(Clone)]
pub struct HttpCloudApi {
    client: Client,
    base_url: Url,
    credentials: Credentials,
}

#[derive(Debug, Serialize)]
struct CreateEnvironmentRequest<'a> {
    label: &'a str,
    branch: &'a str,
}

#[derive(Debug, Serialize)]
struct SwitchCodeRequest<'a> {
    branch: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

// Helper function to convert reqwest errors to OdeError
fn handle_reqwest_error(err: reqwest::Error) -> OdeError {
    OdeError::network(err.to_string())
}

impl HttpCloudApi {
    /// Create a new client for the API at `config.api_url`
    pub fn new(config: &OdeConfig, credentials: Credentials) -> OdeResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("ode/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(handle_reqwest_error)?;

        Ok(Self {
            client,
            base_url: parse_base_url(&config.api_url)?,
            credentials,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> OdeResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| OdeError::config(format!("Invalid API path {}: {}", path, e)))
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> OdeResult<Response> {
        let url = self.url(path)?;
        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .basic_auth(&self.credentials.key, Some(&self.credentials.secret))
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(handle_reqwest_error)?;
        let status = response.status();
        debug!("Response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        Err(OdeError::api(status.as_u16(), error_message(&text, status)))
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> OdeResult<T> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        response
            .json()
            .await
            .map_err(|e| OdeError::serialization(format!("Invalid response from {}: {}", path, e)))
    }
}

#[async_trait]
impl CloudApi for HttpCloudApi {
    async fn list_environments(&self, application_id: &str) -> OdeResult<Vec<Environment>> {
        let list: EnvironmentList = self
            .get_json(&format!("applications/{}/environments", application_id))
            .await?;
        Ok(list.into_items())
    }

    async fn create_environment(
        &self,
        application_id: &str,
        label: &str,
        branch: &str,
    ) -> OdeResult<()> {
        let body = CreateEnvironmentRequest { label, branch };
        self.send(
            Method::POST,
            &format!("applications/{}/environments", application_id),
            Some(&body),
        )
        .await?;
        Ok(())
    }

    async fn get_environment(&self, environment_id: &str) -> OdeResult<Environment> {
        self.get_json(&format!("environments/{}", environment_id)).await
    }

    async fn switch_code(&self, environment_id: &str, branch: &str) -> OdeResult<()> {
        let body = SwitchCodeRequest { branch };
        self.send(
            Method::POST,
            &format!("environments/{}/code/actions/switch", environment_id),
            Some(&body),
        )
        .await?;
        Ok(())
    }

    async fn delete_environment(&self, environment_id: &str) -> OdeResult<()> {
        self.send::<()>(
            Method::DELETE,
            &format!("environments/{}", environment_id),
            None,
        )
        .await?;
        Ok(())
    }
}

/// `Url::join` drops the last segment unless the base ends in a slash
fn parse_base_url(raw: &str) -> OdeResult<Url> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).map_err(|e| OdeError::config(format!("Invalid API URL {}: {}", raw, e)))
}

fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .message
        .or(parsed.error)
        .filter(|m| !m.is_empty())
        .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string())
}
