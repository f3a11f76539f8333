//! Create / update / delete over HTTP, including the post-write cluster refresh

mod common;

use common::{draft, TestApp, NOW};
use jobmatch_core::domain::JobLevel;
use jobmatch_sdk::{JobPayload, ListParams};
use serde_json::{json, Value};

fn payload(name: &str) -> JobPayload {
    JobPayload {
        id: None,
        name: name.to_string(),
        description: "Build APIs".to_string(),
        location: "Da Nang".to_string(),
        salary: 2000.0,
        quantity: 2,
        level: "MIDDLE".to_string(),
        active: true,
        skills: vec!["Rust".to_string(), " SQL ".to_string(), "rust".to_string()],
    }
}

#[tokio::test]
async fn test_create_persists_and_refreshes_clusters() {
    let app = TestApp::start().await;

    let created = app.client.create_job(&payload("  Backend  ")).await.unwrap();
    assert_eq!(created.name, "Backend");
    assert_eq!(created.created_at, Some(NOW));
    assert_eq!(created.skills, vec!["rust", "sql"]);
    assert_eq!(app.cluster.refresh_calls(), 1);

    let stored = app.find(created.id).await.unwrap();
    assert_eq!(stored.level, JobLevel::Middle);
    assert_eq!(stored.cluster, None);
    app.stop().await;
}

#[tokio::test]
async fn test_create_ignores_client_cluster() {
    let app = TestApp::start().await;

    let response = app
        .http
        .post(format!("{}/jobs", app.api_url))
        .json(&json!({"name": "Ops", "level": "JUNIOR", "cluster": 9, "id": 77}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    let id = body["id"].as_i64().unwrap();
    assert_ne!(id, 77);
    assert_eq!(app.find(id).await.unwrap().cluster, None);
    app.stop().await;
}

/// The write is committed even though the caller sees a 500
#[tokio::test]
async fn test_update_with_failing_refresh_is_500_but_persisted() {
    let app = TestApp::start().await;
    let id = app
        .seed(draft("Frontend", JobLevel::Junior, 900.0, &["ts"]), Some(3))
        .await;
    app.cluster.fail_refresh(true);

    let mut update = payload("Frontend Lead");
    update.id = Some(id);
    let err = app.client.update_job(&update).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(app.cluster.refresh_calls(), 1);

    let stored = app.find(id).await.unwrap();
    assert_eq!(stored.name, "Frontend Lead");
    assert_eq!(stored.cluster, Some(3));
    assert_eq!(stored.created_at, NOW);
    assert_eq!(stored.updated_at, Some(NOW));
    app.stop().await;
}

#[tokio::test]
async fn test_create_with_failing_refresh_is_500_but_persisted() {
    let app = TestApp::start().await;
    app.cluster.fail_refresh(true);

    let err = app.client.create_job(&payload("Data Engineer")).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(app.cluster.refresh_calls(), 1);

    let listed = app
        .client
        .list_jobs(&ListParams::default().filter("name : 'Data Engineer'"))
        .await
        .unwrap();
    assert_eq!(listed.meta.total, 1);

    let stored = app.find(listed.result[0].id).await.unwrap();
    assert_eq!(stored.created_at, NOW);
    assert!(stored.skills.contains("rust") && stored.skills.contains("sql"));
    assert_eq!(stored.cluster, None);
    app.stop().await;
}

#[tokio::test]
async fn test_update_returns_updated_at() {
    let app = TestApp::start().await;
    let id = app
        .seed(draft("QA", JobLevel::Fresher, 500.0, &[]), None)
        .await;

    let mut update = payload("QA Engineer");
    update.id = Some(id);
    let updated = app.client.update_job(&update).await.unwrap();
    assert_eq!(updated.id, id);
    assert_eq!(updated.updated_at, Some(NOW));
    assert_eq!(updated.created_at, None);
    app.stop().await;
}

#[tokio::test]
async fn test_delete_does_not_refresh() {
    let app = TestApp::start().await;
    let id = app
        .seed(draft("Temp", JobLevel::Intern, 0.0, &[]), None)
        .await;

    app.client.delete_job(id).await.unwrap();
    assert!(app.find(id).await.is_none());
    assert_eq!(app.cluster.refresh_calls(), 0);

    let err = app.client.delete_job(id).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    app.stop().await;
}

#[tokio::test]
async fn test_invalid_mutations_are_400() {
    let app = TestApp::start().await;

    let err = app.client.get_job(404).await.unwrap_err();
    assert_eq!(err.status(), Some(400));

    let err = app.client.update_job(&payload("No id")).await.unwrap_err();
    assert_eq!(err.status(), Some(400));

    let mut unknown = payload("Ghost");
    unknown.id = Some(999);
    let err = app.client.update_job(&unknown).await.unwrap_err();
    assert_eq!(err.status(), Some(400));

    let err = app.client.create_job(&payload("   ")).await.unwrap_err();
    assert_eq!(err.status(), Some(400));

    let mut negative = payload("Negative");
    negative.salary = -1.0;
    let err = app.client.create_job(&negative).await.unwrap_err();
    assert_eq!(err.status(), Some(400));

    let mut bad_level = payload("Boss");
    bad_level.level = "BOSS".to_string();
    let err = app.client.create_job(&bad_level).await.unwrap_err();
    assert_eq!(err.status(), Some(400));

    let response = app
        .http
        .get(format!("{}/jobs/not-a-number", app.api_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    assert_eq!(app.cluster.refresh_calls(), 0);
    app.stop().await;
}
