mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::Value;

use common::{spawn_app, SHARE_EMAIL};
use drive_relay::application::services::folders::resolve_folder;

fn names(body: &Value, key: &str) -> Vec<String> {
    body[key]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn resolving_a_folder_twice_creates_it_once() {
    let app = spawn_app().await;

    let first = resolve_folder(app.drive.as_ref(), "Invoices").await.unwrap();
    let second = resolve_folder(app.drive.as_ref(), "Invoices").await.unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.id, second.id);
    assert_eq!(app.drive.folders_named("Invoices").len(), 1);
}

#[tokio::test]
async fn folder_files_exclude_trashed_and_other_folders() {
    let app = spawn_app().await;
    let docs = app.drive.insert_folder("Docs");
    let other = app.drive.insert_folder("Other");
    app.drive.insert_file("kept.txt", &docs, b"12345");
    let trashed = app.drive.insert_file("gone.txt", &docs, b"x");
    app.drive.insert_file("elsewhere.txt", &other, b"x");
    app.server
        .post("/trash-file")
        .add_query_param("fileId", &trashed)
        .await
        .assert_status_ok();

    let response = app
        .server
        .get("/list-drive-files")
        .add_query_param("folderName", "Docs")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["folderName"], "Docs");
    assert_eq!(names(&body, "files"), vec!["kept.txt"]);
    assert_eq!(body["files"][0]["formattedSize"], "5 B");
    assert!(body["files"][0]["formattedDate"].is_string());
}

#[tokio::test]
async fn listing_missing_folder_creates_it_empty() {
    let app = spawn_app().await;

    let response = app.server.get("/list-drive-files").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["folderName"], "Uploads");
    assert!(body["files"].as_array().unwrap().is_empty());
    assert_eq!(app.drive.folders_named("Uploads").len(), 1);
}

#[tokio::test]
async fn color_labels_show_in_listings_and_filter() {
    let app = spawn_app().await;
    let docs = app.drive.insert_folder("Docs");
    let red = app.drive.insert_file("red.txt", &docs, b"x");
    app.drive.insert_file("plain.txt", &docs, b"x");

    app.server
        .post("/update-file-color")
        .add_query_param("fileId", &red)
        .add_query_param("color", "red")
        .await
        .assert_status_ok();

    let response = app
        .server
        .get("/list-drive-files")
        .add_query_param("folderName", "Docs")
        .add_query_param("property", "colorLabel")
        .add_query_param("value", "red")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(names(&body, "files"), vec!["red.txt"]);
    assert_eq!(body["files"][0]["colorLabel"], "red");
}

#[tokio::test]
async fn folder_listing_reports_color_labels() {
    let app = spawn_app().await;
    let archive = app.drive.insert_folder("Archive");
    app.drive.insert_folder("Inbox");
    app.drive.insert_file("loose.txt", &archive, b"x");

    app.server
        .post("/update-folder-color")
        .add_query_param("folderId", &archive)
        .add_query_param("color", "green")
        .await
        .assert_status_ok();

    let response = app.server.get("/list-drive-folders").await;

    response.assert_status_ok();
    let body: Value = response.json();
    let folders = body["folders"].as_array().unwrap();
    assert_eq!(folders.len(), 2);
    let archive_entry = folders.iter().find(|f| f["id"] == archive.as_str()).unwrap();
    assert_eq!(archive_entry["colorLabel"], "green");
    let inbox_entry = folders.iter().find(|f| f["name"] == "Inbox").unwrap();
    assert!(inbox_entry["colorLabel"].is_null());
}

#[tokio::test]
async fn recent_files_cover_the_last_week() {
    let app = spawn_app().await;
    let docs = app.drive.insert_folder("Docs");
    app.drive
        .insert_file_modified_at("old.txt", &docs, b"x", Utc::now() - Duration::days(30));
    app.drive
        .insert_file_modified_at("fresh.txt", &docs, b"x", Utc::now() - Duration::days(2));

    let response = app.server.get("/list-recent-files").await;

    response.assert_status_ok();
    let body: Value = response.json();
    let listed = names(&body, "files");
    assert!(listed.contains(&"fresh.txt".to_string()));
    assert!(!listed.contains(&"old.txt".to_string()));
    assert!(body.get("folderName").is_none());
}

#[tokio::test]
async fn trashed_listing_only_has_trashed_files() {
    let app = spawn_app().await;
    let docs = app.drive.insert_folder("Docs");
    let gone = app.drive.insert_file("gone.txt", &docs, b"x");
    app.drive.insert_file("kept.txt", &docs, b"x");
    app.server
        .post("/trash-file")
        .add_query_param("fileId", &gone)
        .await
        .assert_status_ok();

    let response = app.server.get("/list-trashed-files").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(names(&body, "files"), vec!["gone.txt"]);
}

#[tokio::test]
async fn listing_failure_is_server_error() {
    let app = spawn_app().await;
    app.drive.set_failing(true);

    let response = app.server.get("/list-drive-folders").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Failed to list folders: Backend unavailable");
}

#[tokio::test]
async fn create_folder_always_creates_and_shares() {
    let app = spawn_app().await;

    for _ in 0..2 {
        let response = app
            .server
            .post("/create-folder")
            .add_query_param("folderName", "Projects")
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["folder"]["name"], "Projects");
        assert!(body["folder"]["webViewLink"].is_string());
    }

    assert_eq!(app.drive.folders_named("Projects").len(), 2);
    assert_eq!(app.drive.permissions().len(), 2);
}

#[tokio::test]
async fn create_folder_requires_name() {
    let app = spawn_app().await;

    let response = app.server.post("/create-folder").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Folder name is required");
}

#[tokio::test]
async fn trash_folder_is_shared_only_when_created() {
    let app = spawn_app().await;

    let first: Value = app.server.post("/ensure-trash-folder").await.json();
    let second: Value = app.server.post("/ensure-trash-folder").await.json();

    assert_eq!(first["folderId"], second["folderId"]);
    assert_eq!(app.drive.folders_named("Trash").len(), 1);

    let permissions = app.drive.permissions();
    assert_eq!(permissions.len(), 1);
    assert_eq!(permissions[0].0, first["folderId"].as_str().unwrap());
    assert!(format!("{:?}", permissions[0].1.grantee).contains(SHARE_EMAIL));
}

#[tokio::test]
async fn health_reports_share_email() {
    let app = spawn_app().await;

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["shareEmail"], SHARE_EMAIL);
}
