// HTTP ClusterResolver
//
// GET {base}/predict-user-cluster/{userId} -> {"cluster": <int>}
// GET {base}/cluster                       -> 2xx

use async_trait::async_trait;
use jobmatch_core::domain::{ClusterLabel, UserId};
use jobmatch_core::port::{ClusterResolver, ResolutionFailure};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub struct HttpClusterResolver {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpClusterResolver {
    /// Every request (connect + body) is bounded by `timeout`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ResolutionFailure> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ResolutionFailure::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn map_reqwest_error(&self, err: reqwest::Error) -> ResolutionFailure {
        if err.is_timeout() {
            ResolutionFailure::Timeout(self.timeout.as_millis() as u64)
        } else {
            ResolutionFailure::Transport(err.to_string())
        }
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, ResolutionFailure> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "Cluster service responded");
        if !status.is_success() {
            return Err(ResolutionFailure::Status(status.as_u16()));
        }
        Ok(response)
    }
}

/// Pull an integer `cluster` out of the prediction response body
fn parse_cluster(body: &[u8]) -> Result<ClusterLabel, ResolutionFailure> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ResolutionFailure::MalformedBody(e.to_string()))?;

    let Value::Object(map) = value else {
        return Err(ResolutionFailure::MalformedBody(
            "expected a JSON object".to_string(),
        ));
    };

    let cluster = map
        .get("cluster")
        .ok_or(ResolutionFailure::MissingField("cluster"))?;

    cluster
        .as_i64()
        .and_then(|c| ClusterLabel::try_from(c).ok())
        .ok_or_else(|| ResolutionFailure::NonInteger(cluster.to_string()))
}

#[async_trait]
impl ClusterResolver for HttpClusterResolver {
    async fn resolve_cluster(&self, user_id: UserId) -> Result<ClusterLabel, ResolutionFailure> {
        let response = self
            .get(&format!("/predict-user-cluster/{}", user_id))
            .await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let cluster = parse_cluster(&body)?;
        debug!(user_id, cluster, "Resolved user cluster");
        Ok(cluster)
    }

    async fn refresh_clusters(&self) -> Result<(), ResolutionFailure> {
        self.get("/cluster").await?;
        Ok(())
    }
}
