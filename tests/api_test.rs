use std::fs;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use jotter::http::router;
use jotter::NoteStore;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

fn app_in(tmp: &TempDir) -> Router {
    router(NoteStore::open(tmp.path().join("notes.json")))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, body: Value) -> Value {
    let (status, note) = send(app, Method::POST, "/api/notes", Some(&body.to_string())).await;
    assert_eq!(status, StatusCode::CREATED);
    note
}

#[tokio::test]
async fn test_list_empty() {
    let tmp = TempDir::new().unwrap();
    let app = app_in(&tmp);

    let (status, body) = send(&app, Method::GET, "/api/notes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_health() {
    let tmp = TempDir::new().unwrap();
    let app = app_in(&tmp);

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_note() {
    let tmp = TempDir::new().unwrap();
    let app = app_in(&tmp);

    let note = create(
        &app,
        json!({"title": "Plan", "content": "ship it", "topics": ["q3"], "categories": ["", "Work", "  ", "Life"]}),
    )
    .await;

    assert_eq!(note["title"], "Plan");
    assert_eq!(note["content"], "ship it");
    assert_eq!(note["topics"], json!(["q3"]));
    assert_eq!(note["categories"], json!(["Work", "Life"]));
    assert!(note["id"].is_i64());
    assert!(note["created_at"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_create_defaults() {
    let tmp = TempDir::new().unwrap();
    let app = app_in(&tmp);

    let note = create(&app, json!({"title": "Bare"})).await;
    assert_eq!(note["content"], "");
    assert_eq!(note["topics"], json!([]));
    assert_eq!(note["categories"], json!(["Uncategorized"]));
}

#[tokio::test]
async fn test_create_with_legacy_category() {
    let tmp = TempDir::new().unwrap();
    let app = app_in(&tmp);

    let note = create(&app, json!({"title": "Old client", "category": "Home, Garden ,"})).await;
    assert_eq!(note["categories"], json!(["Home", "Garden"]));
}

#[tokio::test]
async fn test_create_without_title_is_bad_request() {
    let tmp = TempDir::new().unwrap();
    let app = app_in(&tmp);

    for body in [r#"{"content": "x"}"#, "{}", "not json", "[1, 2]", ""] {
        let (status, error) = send(&app, Method::POST, "/api/notes", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(error["error"], "Invalid payload");
    }

    assert!(!tmp.path().join("notes.json").exists());
}

#[tokio::test]
async fn test_list_most_recent_first() {
    let tmp = TempDir::new().unwrap();
    let app = app_in(&tmp);

    for title in ["first", "second", "third"] {
        create(&app, json!({ "title": title })).await;
    }

    let (_, notes) = send(&app, Method::GET, "/api/notes", None).await;
    let titles: Vec<&str> = notes
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_categories() {
    let tmp = TempDir::new().unwrap();
    let app = app_in(&tmp);

    create(&app, json!({"title": "a", "categories": ["Work"]})).await;
    create(&app, json!({"title": "b", "categories": ["Work", "Life"]})).await;
    create(&app, json!({"title": "c"})).await;

    let (status, body) = send(&app, Method::GET, "/api/categories", None).await;
    assert_eq!(status, StatusCode::OK);

    let counts = body.as_array().unwrap();
    assert_eq!(counts.len(), 3);
    for (name, expected) in [("Work", 2), ("Life", 1), ("Uncategorized", 1)] {
        let entry = counts.iter().find(|c| c["name"] == name).unwrap();
        assert_eq!(entry["count"], expected);
    }
}

#[tokio::test]
async fn test_get_patch_delete() {
    let tmp = TempDir::new().unwrap();
    let app = app_in(&tmp);

    let note = create(&app, json!({"title": "t", "topics": ["x"], "categories": ["Work"]})).await;
    let uri = format!("/api/notes/{}", note["id"]);

    let (status, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, note);

    let (status, patched) = send(&app, Method::PATCH, &uri, Some(r#"{"content": "x"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["content"], "x");
    for field in ["id", "title", "topics", "categories", "created_at"] {
        assert_eq!(patched[field], note[field], "field {field} changed");
    }

    let (status, patched) =
        send(&app, Method::PATCH, &uri, Some(r#"{"category": "a, b", "title": "t2"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["categories"], json!(["a", "b"]));
    assert_eq!(patched["title"], "t2");

    let (status, deleted) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({ "deleted": note["id"] }));

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patch_with_empty_body_changes_nothing() {
    let tmp = TempDir::new().unwrap();
    let app = app_in(&tmp);

    let note = create(&app, json!({"title": "t"})).await;
    let uri = format!("/api/notes/{}", note["id"]);

    let (status, patched) = send(&app, Method::PATCH, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched, note);
}

#[tokio::test]
async fn test_missing_note_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let app = app_in(&tmp);

    let note = create(&app, json!({"title": "keep"})).await;
    let path = tmp.path().join("notes.json");
    let before = fs::read_to_string(&path).unwrap();
    let uri = format!("/api/notes/{}", note["id"].as_i64().unwrap() + 1);

    for (method, body) in [
        (Method::GET, None),
        (Method::PATCH, Some(r#"{"title": "x"}"#)),
        (Method::DELETE, None),
    ] {
        let (status, error) = send(&app, method, &uri, body).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error["error"], "Not found");
    }

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[tokio::test]
async fn test_legacy_file_is_normalized_on_read() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("notes.json");
    fs::write(
        &path,
        r#"[{"id": 42, "title": "legacy", "content": "", "topics": [], "category": "Work, Life", "created_at": "2023-06-01T10:00:00.000000Z"}]"#,
    )
    .unwrap();
    let app = app_in(&tmp);

    let (_, notes) = send(&app, Method::GET, "/api/notes", None).await;
    assert_eq!(notes[0]["categories"], json!(["Work", "Life"]));
    assert!(notes[0].get("category").is_none());

    let on_disk: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk, notes);

    let (_, counts) = send(&app, Method::GET, "/api/categories", None).await;
    assert_eq!(counts, json!([{"name": "Work", "count": 1}, {"name": "Life", "count": 1}]));
}

#[tokio::test]
async fn test_patch_stores_fields_verbatim() {
    let tmp = TempDir::new().unwrap();
    let app = app_in(&tmp);

    let note = create(&app, json!({"title": "t"})).await;
    let uri = format!("/api/notes/{}", note["id"]);

    let (status, patched) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(r#"{"topics": "rust", "content": null, "title": 3}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["topics"], "rust");
    assert_eq!(patched["content"], Value::Null);
    assert_eq!(patched["title"], 3);
    assert_eq!(patched["categories"], note["categories"]);

    let (status, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, patched);
}

#[tokio::test]
async fn test_mixed_shape_file_survives_mutation() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("notes.json");
    let existing = json!([
        {"id": 1, "title": "odd", "topics": "not-a-list", "categories": "Work"},
        {"id": 2, "title": null, "category": "Home", "extra": {"nested": [1, 2]}},
        {"id": 3, "title": "fine", "content": "", "topics": [], "categories": ["Life"], "created_at": "2023-01-01T00:00:00Z"}
    ]);
    fs::write(&path, existing.to_string()).unwrap();
    let app = app_in(&tmp);

    let (_, notes) = send(&app, Method::GET, "/api/notes", None).await;
    assert_eq!(notes.as_array().unwrap().len(), 3);

    create(&app, json!({"title": "new"})).await;
    let (status, _) = send(&app, Method::DELETE, "/api/notes/3", None).await;
    assert_eq!(status, StatusCode::OK);

    let on_disk: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let records = on_disk.as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["title"], "new");
    assert_eq!(records[1], existing[0]);
    assert_eq!(records[2]["title"], Value::Null);
    assert_eq!(records[2]["categories"], json!(["Home"]));
    assert_eq!(records[2]["extra"], json!({"nested": [1, 2]}));

    let (_, counts) = send(&app, Method::GET, "/api/categories", None).await;
    assert_eq!(
        counts,
        json!([{"name": "Uncategorized", "count": 2}, {"name": "Home", "count": 1}])
    );
}
