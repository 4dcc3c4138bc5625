//! Integration tests for the HTTP repository client.
//!
//! Each test starts an in-process axum server that imitates the hosting
//! API's repository endpoints and points a `GitHubClient` at it.
//!
//! Run with: `cargo test --package repodeck-client --test github_api`

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, patch},
};
use repodeck_client::{ClientError, GitHubClient, RepositoryApi};
use repodeck_core::domain::repository::RepositoryKey;
use repodeck_core::dto::repository::{ListQuery, NewRepositoryRequest, SortDirection, SortKey};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// What the fake server saw, one line per request
#[derive(Clone, Default)]
struct Seen(Arc<Mutex<Vec<String>>>);

impl Seen {
    fn push(&self, line: String) {
        self.0.lock().unwrap().push(line);
    }

    fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

fn repo_json(owner: &str, name: &str, description: Option<&str>) -> Value {
    json!({
        "id": 7,
        "name": name,
        "full_name": format!("{owner}/{name}"),
        "description": description,
        "language": "Rust",
        "stargazers_count": 3,
        "owner": { "login": owner, "avatar_url": format!("https://avatars.test/{owner}") }
    })
}

async fn list_repos(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    seen.push(format!(
        "GET sort={} direction={} auth={}",
        params.get("sort").map(String::as_str).unwrap_or("-"),
        params.get("direction").map(String::as_str).unwrap_or("-"),
        auth
    ));

    if auth == "Bearer revoked" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Bad credentials" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!([
            repo_json("a", "r2", None),
            repo_json("a", "r1", Some("d1")),
        ])),
    )
}

async fn create_repo(State(seen): State<Seen>, Json(body): Json<Value>) -> impl IntoResponse {
    seen.push(format!("POST {body}"));

    let name = body["name"].as_str().unwrap_or_default().to_string();
    if name == "taken" {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message": "Repository creation failed." })),
        );
    }

    let description = body["description"].as_str();
    (StatusCode::CREATED, Json(repo_json("a", &name, description)))
}

async fn update_repo(
    State(seen): State<Seen>,
    Path((owner, repo)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    seen.push(format!("PATCH {owner}/{repo} {body}"));

    if repo == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" })));
    }

    let name = body["name"].as_str().unwrap_or_default().to_string();
    let description = body["description"].as_str();
    (StatusCode::OK, Json(repo_json(&owner, &name, description)))
}

async fn delete_repo(
    State(seen): State<Seen>,
    Path((owner, repo)): Path<(String, String)>,
) -> StatusCode {
    seen.push(format!("DELETE {owner}/{repo}"));

    match repo.as_str() {
        "missing" => StatusCode::NOT_FOUND,
        "protected" => StatusCode::FORBIDDEN,
        _ => StatusCode::NO_CONTENT,
    }
}

async fn broken_body() -> impl IntoResponse {
    (StatusCode::OK, "this is not json")
}

/// Start the fake API and return its base URL
async fn start_server(seen: Seen) -> String {
    let router = Router::new()
        .route("/user/repos", get(list_repos).post(create_repo))
        .route("/repos/{owner}/{repo}", patch(update_repo).delete(delete_repo))
        .route("/broken/user/repos", get(broken_body))
        .with_state(seen);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn test_list_passes_query_and_token() -> anyhow::Result<()> {
    let seen = Seen::default();
    let base = start_server(seen.clone()).await;
    let client = GitHubClient::new(&base).with_token("secret");

    let repos = client.list(ListQuery::default()).await?;

    assert_eq!(repos.len(), 2);
    assert_eq!(repos[0].name(), "r2");
    assert_eq!(repos[1].name(), "r1");
    assert_eq!(repos[1].description(), Some("d1"));
    assert_eq!(repos[1].primary_language(), Some("Rust"));
    assert_eq!(repos[1].owner_avatar_url(), Some("https://avatars.test/a"));
    assert_eq!(
        seen.lines(),
        vec!["GET sort=created direction=desc auth=Bearer secret"]
    );

    let query = ListQuery::new(SortKey::FullName, SortDirection::Asc);
    client.list(query).await?;
    assert_eq!(
        seen.lines()[1],
        "GET sort=full_name direction=asc auth=Bearer secret"
    );

    Ok(())
}

#[tokio::test]
async fn test_list_unauthorized_carries_status_and_message() {
    let base = start_server(Seen::default()).await;
    let client = GitHubClient::new(&base).with_token("revoked");

    let err = client.list(ListQuery::default()).await.unwrap_err();

    match err {
        ClientError::ApiError { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Bad credentials");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_sends_body() -> anyhow::Result<()> {
    let seen = Seen::default();
    let base = start_server(seen.clone()).await;
    let client = GitHubClient::new(&base);

    let created = client
        .create(&NewRepositoryRequest::new("fresh", Some("hello".to_string())))
        .await?;

    assert_eq!(created.name(), "fresh");
    assert_eq!(created.description(), Some("hello"));
    assert_eq!(
        seen.lines(),
        vec![r#"POST {"description":"hello","name":"fresh"}"#]
    );

    let err = client
        .create(&NewRepositoryRequest::new("taken", None))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(422));

    Ok(())
}

#[tokio::test]
async fn test_update_addresses_current_name() -> anyhow::Result<()> {
    let seen = Seen::default();
    let base = start_server(seen.clone()).await;
    let client = GitHubClient::new(&base);

    let renamed = client
        .update(
            &RepositoryKey::new("a", "r1"),
            &NewRepositoryRequest::new("r2", Some("d2".to_string())),
        )
        .await?;

    assert_eq!(renamed.owner(), "a");
    assert_eq!(renamed.name(), "r2");
    assert_eq!(renamed.description(), Some("d2"));
    assert_eq!(
        seen.lines(),
        vec![r#"PATCH a/r1 {"description":"d2","name":"r2"}"#]
    );

    let err = client
        .update(
            &RepositoryKey::new("a", "missing"),
            &NewRepositoryRequest::new("x", None),
        )
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    Ok(())
}

#[tokio::test]
async fn test_delete_status_handling() -> anyhow::Result<()> {
    let seen = Seen::default();
    let base = start_server(seen.clone()).await;
    let client = GitHubClient::new(&base);

    client.delete(&RepositoryKey::new("a", "r1")).await?;

    let err = client
        .delete(&RepositoryKey::new("a", "missing"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));

    let err = client
        .delete(&RepositoryKey::new("a", "protected"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(403));

    assert_eq!(
        seen.lines(),
        vec!["DELETE a/r1", "DELETE a/missing", "DELETE a/protected"]
    );

    Ok(())
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let base = start_server(Seen::default()).await;
    let client = GitHubClient::new(format!("{base}/broken"));

    let err = client.list(ListQuery::default()).await.unwrap_err();

    assert!(matches!(err, ClientError::ParseError(_)), "got {err:?}");
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = GitHubClient::new(format!("http://{addr}"));
    let err = client.list(ListQuery::default()).await.unwrap_err();

    assert!(matches!(err, ClientError::Network(_)), "got {err:?}");
    assert_eq!(err.status(), None);
}
