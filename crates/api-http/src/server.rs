//! HTTP Server
//!
//! Binds a TCP listener and serves the `/api/v1` router until stopped.

use crate::handler::{self, AppState};
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info};

const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
const DEFAULT_HTTP_PORT: u16 = 8080;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// HTTP Server Configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub host: String,
    /// 0 picks a free port (tests)
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

/// All routes, without a listener
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/v1/jobs",
            get(handler::list_jobs)
                .post(handler::create_job)
                .put(handler::update_job),
        )
        .route(
            "/api/v1/jobs/{id}",
            get(handler::get_job).delete(handler::delete_job),
        )
        .route("/api/v1/job-cluster/jobs", get(handler::list_cluster_jobs))
        .with_state(state)
}

pub struct HttpServer {
    config: HttpServerConfig,
    state: AppState,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Bind and start serving in the background
    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr().map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = router(self.state);

        let task = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = result {
                error!(error = %e, "HTTP server terminated with error");
            }
        });

        info!(addr = %local_addr, "HTTP server started");
        Ok(ServerHandle {
            local_addr,
            shutdown_tx: Some(shutdown_tx),
            task,
        })
    }
}

/// Running server; dropping it does not stop the server
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for in-flight requests
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.task.await {
            error!(error = %e, "HTTP server task panicked");
        }
        info!("HTTP server stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobmatch_core::application::{JobCommandService, JobQueryService};
    use jobmatch_core::domain::{Job, PageLimits};
    use jobmatch_core::port::cluster_resolver::mocks::MockClusterResolver;
    use jobmatch_core::port::job_repository::mocks::InMemoryJobRepository;
    use jobmatch_core::port::time_provider::FixedTimeProvider;
    use jobmatch_core::port::ResolutionFailure;
    use serde_json::{json, Value};
    use std::sync::Arc;

    async fn start(resolver: MockClusterResolver, jobs: Vec<Job>) -> (ServerHandle, String) {
        let repo = Arc::new(InMemoryJobRepository::with_jobs(jobs));
        let queries = Arc::new(JobQueryService::new(repo.clone(), Arc::new(resolver)));
        let commands = Arc::new(JobCommandService::new(
            repo,
            queries.clone(),
            Arc::new(FixedTimeProvider(1_000)),
        ));
        let state = AppState {
            queries,
            commands,
            limits: PageLimits::default(),
        };
        let config = HttpServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        };
        let handle = HttpServer::new(config, state).start().await.unwrap();
        let base = format!("http://{}/api/v1", handle.local_addr());
        (handle, base)
    }

    fn clustered(n: usize, cluster: i32) -> Vec<Job> {
        (0..n)
            .map(|i| Job::new_test(format!("job-{}", i), Some(cluster)))
            .collect()
    }

    #[tokio::test]
    async fn test_cluster_listing_pages_results() {
        let mut jobs = clustered(25, 2);
        jobs.extend(clustered(5, 3));
        let (handle, base) = start(MockClusterResolver::with_label(2), jobs).await;

        let body: Value = reqwest::get(format!("{}/job-cluster/jobs?userId=7&size=10", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["meta"], json!({"page": 0, "pageSize": 10, "pages": 3, "total": 25}));
        assert_eq!(body["result"].as_array().unwrap().len(), 10);
        handle.stop().await;
    }

    #[tokio::test]
    async fn test_cluster_failure_is_bad_request() {
        let resolver = MockClusterResolver::failing(ResolutionFailure::Status(503));
        let (handle, base) = start(resolver, clustered(3, 1)).await;

        let response = reqwest::get(format!("{}/job-cluster/jobs?userId=7", base))
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["statusCode"], 400);
        assert!(body.get("result").is_none());

        let missing = reqwest::get(format!("{}/job-cluster/jobs", base)).await.unwrap();
        assert_eq!(missing.status().as_u16(), 400);
        handle.stop().await;
    }

    #[tokio::test]
    async fn test_bad_filter_names_the_field() {
        let (handle, base) = start(MockClusterResolver::with_label(1), vec![]).await;

        let response = reqwest::Client::new()
            .get(format!("{}/jobs", base))
            .query(&[("filter", "colour : red")])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["field"], "colour");
        handle.stop().await;
    }

    #[tokio::test]
    async fn test_crud_round_trip() {
        let (handle, base) = start(MockClusterResolver::with_label(1), vec![]).await;
        let client = reqwest::Client::new();

        let created = client
            .post(format!("{}/jobs", base))
            .json(&json!({"name": "Backend", "level": "SENIOR", "skills": ["Rust"]}))
            .send()
            .await
            .unwrap();
        assert_eq!(created.status().as_u16(), 201);
        let created: Value = created.json().await.unwrap();
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["createdAt"], 1_000);

        let updated = client
            .put(format!("{}/jobs", base))
            .json(&json!({"id": id, "name": "Backend II", "level": "MIDDLE"}))
            .send()
            .await
            .unwrap();
        assert_eq!(updated.status().as_u16(), 200);

        let fetched: Value = client
            .get(format!("{}/jobs/{}", base, id))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(fetched["name"], "Backend II");

        let deleted = client
            .delete(format!("{}/jobs/{}", base, id))
            .send()
            .await
            .unwrap();
        assert_eq!(deleted.status().as_u16(), 200);

        let gone = client
            .get(format!("{}/jobs/{}", base, id))
            .send()
            .await
            .unwrap();
        assert_eq!(gone.status().as_u16(), 400);
        handle.stop().await;
    }
}
