//! Shared harness: real SQLite (in-memory), real HTTP server, fake cluster service.

#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use jobmatch_api_http::{AppState, HttpServer, HttpServerConfig, ServerHandle};
use jobmatch_core::application::{JobCommandService, JobQueryService};
use jobmatch_core::domain::{ClusterLabel, Job, JobDraft, JobId, JobLevel, PageLimits};
use jobmatch_core::port::time_provider::FixedTimeProvider;
use jobmatch_core::port::JobRepository;
use jobmatch_infra_cluster::HttpClusterResolver;
use jobmatch_infra_sqlite::{create_pool, run_migrations, SqliteJobRepository};
use jobmatch_sdk::JobmatchClient;
use sqlx::SqlitePool;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const NOW: i64 = 1_700_000_000_000;

/// Users at or above this id make the fake service answer 500
pub const FAILING_USER: i64 = 1000;

#[derive(Clone, Default)]
pub struct FakeCluster {
    refresh_calls: Arc<AtomicUsize>,
    refresh_fails: Arc<AtomicBool>,
}

impl FakeCluster {
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn fail_refresh(&self, fail: bool) {
        self.refresh_fails.store(fail, Ordering::SeqCst);
    }
}

/// `cluster = user_id % 10`
async fn predict(Path(user_id): Path<i64>) -> Response {
    if user_id >= FAILING_USER {
        return (StatusCode::INTERNAL_SERVER_ERROR, "model not loaded").into_response();
    }
    let body = format!(r#"{{"cluster": {}}}"#, user_id % 10);
    (StatusCode::OK, body).into_response()
}

async fn refresh(State(fake): State<FakeCluster>) -> StatusCode {
    fake.refresh_calls.fetch_add(1, Ordering::SeqCst);
    if fake.refresh_fails.load(Ordering::SeqCst) {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    }
}

async fn spawn_fake_cluster(fake: FakeCluster) -> SocketAddr {
    let app = Router::new()
        .route("/predict-user-cluster/{user_id}", get(predict))
        .route("/cluster", get(refresh))
        .with_state(fake);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

pub struct TestApp {
    pub api_url: String,
    pub client: JobmatchClient,
    pub http: reqwest::Client,
    pub pool: SqlitePool,
    pub repo: Arc<SqliteJobRepository>,
    pub cluster: FakeCluster,
    server: ServerHandle,
}

impl TestApp {
    pub async fn start() -> Self {
        let cluster = FakeCluster::default();
        let cluster_addr = spawn_fake_cluster(cluster.clone()).await;
        Self::start_with_cluster_url(&format!("http://{}", cluster_addr), cluster).await
    }

    /// Cluster service that refuses connections
    pub async fn start_without_cluster() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        Self::start_with_cluster_url(&format!("http://{}", addr), FakeCluster::default()).await
    }

    async fn start_with_cluster_url(cluster_url: &str, cluster: FakeCluster) -> Self {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        let repo = Arc::new(SqliteJobRepository::new(pool.clone()));
        let resolver =
            Arc::new(HttpClusterResolver::new(cluster_url, Duration::from_secs(2)).unwrap());
        let queries = Arc::new(JobQueryService::new(repo.clone(), resolver));
        let commands = Arc::new(JobCommandService::new(
            repo.clone(),
            queries.clone(),
            Arc::new(FixedTimeProvider(NOW)),
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
        let server = HttpServer::new(config, state).start().await.unwrap();
        let root = format!("http://{}", server.local_addr());

        Self {
            api_url: format!("{}/api/v1", root),
            client: JobmatchClient::connect(&root).unwrap(),
            http: reqwest::Client::new(),
            pool,
            repo,
            cluster,
            server,
        }
    }

    /// Insert directly through the repository, then set the cluster column the
    /// way the refresh service would
    pub async fn seed(&self, draft: JobDraft, cluster: Option<ClusterLabel>) -> JobId {
        let id = self.repo.insert(&Job::new(draft, NOW)).await.unwrap();
        sqlx::query("UPDATE jobs SET cluster = ? WHERE id = ?")
            .bind(cluster)
            .bind(id)
            .execute(&self.pool)
            .await
            .unwrap();
        id
    }

    pub async fn find(&self, id: JobId) -> Option<Job> {
        self.repo.find_by_id(id).await.unwrap()
    }

    pub async fn stop(self) {
        self.server.stop().await;
    }
}

pub fn draft(name: &str, level: JobLevel, salary: f64, skills: &[&str]) -> JobDraft {
    JobDraft {
        name: name.to_string(),
        description: format!("{} role", name),
        location: "Hanoi".to_string(),
        salary,
        quantity: 1,
        level,
        active: true,
        skills: skills.iter().map(|s| s.to_string()).collect(),
    }
}
