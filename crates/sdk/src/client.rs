//! Jobmatch Client Implementation

use crate::error::{ErrorBody, Result, SdkError};
use crate::types::{Job, JobPayload, ListParams, Page};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Jobmatch API Client
///
/// # Example
///
/// ```no_run
/// use jobmatch_sdk::JobmatchClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = JobmatchClient::connect("http://127.0.0.1:8080")?;
/// let job = client.get_job(1).await?;
/// println!("{}", job.name);
/// # Ok(())
/// # }
/// ```
pub struct JobmatchClient {
    client: Client,
    base_url: String,
}

impl JobmatchClient {
    /// Build a client for a daemon
    ///
    /// # Arguments
    ///
    /// * `url` - Server root (e.g., `http://127.0.0.1:8080`), without `/api/v1`
    pub fn connect(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref().trim_end_matches('/');
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(SdkError::InvalidUrl(url.to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            client,
            base_url: format!("{}/api/v1", url),
        })
    }

    /// List jobs matching `params`
    pub async fn list_jobs(&self, params: &ListParams) -> Result<Page<Job>> {
        let request = self
            .client
            .get(format!("{}/jobs", self.base_url))
            .query(&params.to_query());
        send_json(request).await
    }

    /// List jobs in the cluster the recommender assigns to `user_id`
    pub async fn recommended_jobs(&self, user_id: i64, params: &ListParams) -> Result<Page<Job>> {
        let mut query = params.to_query();
        query.push(("userId", user_id.to_string()));
        let request = self
            .client
            .get(format!("{}/job-cluster/jobs", self.base_url))
            .query(&query);
        send_json(request).await
    }

    pub async fn get_job(&self, id: i64) -> Result<Job> {
        let request = self.client.get(format!("{}/jobs/{}", self.base_url, id));
        send_json(request).await
    }

    pub async fn create_job(&self, payload: &JobPayload) -> Result<Job> {
        let request = self
            .client
            .post(format!("{}/jobs", self.base_url))
            .json(payload);
        send_json(request).await
    }

    /// Update the job named by `payload.id`
    pub async fn update_job(&self, payload: &JobPayload) -> Result<Job> {
        let request = self
            .client
            .put(format!("{}/jobs", self.base_url))
            .json(payload);
        send_json(request).await
    }

    pub async fn delete_job(&self, id: i64) -> Result<()> {
        let request = self.client.delete(format!("{}/jobs/{}", self.base_url, id));
        send(request).await?;
        Ok(())
    }
}

async fn send(request: RequestBuilder) -> Result<reqwest::Response> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let bytes = response.bytes().await?;
    Err(api_error(status, &bytes))
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let bytes = send(request).await?.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn api_error(status: StatusCode, body: &[u8]) -> SdkError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(body) => SdkError::Api {
            status: status.as_u16(),
            message: body.message,
            field: body.field,
        },
        Err(_) => SdkError::Api {
            status: status.as_u16(),
            message: String::from_utf8_lossy(body).into_owned(),
            field: None,
        },
    }
}
