//! End-to-end route tests: real router, in-memory database, recording media
//! fake. Media assertions check the store/delete traffic the handlers
//! actually generated.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use showcase_api::{AppState, AppStateInner};
use showcase_db::Database;
use showcase_media::testing::RecordingStore;

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

fn test_app(legacy: bool) -> (Router, AppState, Arc<RecordingStore>) {
    let store = Arc::new(RecordingStore::new());
    let state: AppState = Arc::new(AppStateInner {
        db: Database::open_in_memory().unwrap(),
        media: store.clone(),
        jwt_secret: "test-secret".into(),
        legacy_tenant: legacy.then_some(1),
        max_file_size: 10 * 1024 * 1024,
    });
    (showcase_api::router(state.clone()), state, store)
}

struct Form {
    body: Vec<u8>,
}

impl Form {
    fn new() -> Self {
        Self { body: Vec::new() }
    }

    fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn request(mut self, method: &str, uri: &str) -> Request<Body> {
        self.body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Standard profile-creation form; tests tweak from here.
fn profile_form(username: &str) -> Form {
    Form::new()
        .text("name", "Ada Lovelace")
        .text("username", username)
        .text("intro_text", "First programmer")
        .text("highlights", "analytical engine, notes ,")
        .text("securityCode", "1234")
}

#[tokio::test]
async fn create_profile_and_fetch_public_views() {
    let (app, _, store) = test_app(true);

    let req = profile_form("ada")
        .file("profilePicture", "me.png", "image/png", b"png-bytes")
        .request("POST", "/api/profile/create");
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Profile created successfully");

    let profile_id = body["profileId"].as_str().unwrap().to_string();
    assert_eq!(profile_id.len(), 12);
    assert_eq!(store.store_count(), 1);

    let (status, body) = send(&app, get(&format!("/api/profile/{}", profile_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "ada");
    assert_eq!(body["user"]["profile_picture"], store.stored()[0].url);
    // Blank entries in the comma list are dropped
    let highlights = body["highlights"].as_array().unwrap();
    assert_eq!(highlights.len(), 2);
    assert_eq!(highlights[0]["highlight_text"], "analytical engine");
    // Credential hashes never appear in responses
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["user"].get("security_code_hash").is_none());

    let (status, body) = send(&app, get("/api/profile/username/ada")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profileId"], profile_id.as_str());
    assert_eq!(body["name"], "Ada Lovelace");

    let (status, body) = send(&app, get("/api/profile/doesnotexist1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Profile not found");
}

#[tokio::test]
async fn create_profile_rejects_bad_input() {
    let (app, _, _) = test_app(true);

    let req = Form::new()
        .text("name", "Ada")
        .request("POST", "/api/profile/create");
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Name, username, intro text, and highlights are required"
    );

    let req = profile_form("ada").text("securityCode", " ").request("POST", "/api/profile/create");
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = profile_form("ada lovelace").request("POST", "/api/profile/create");
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Username can only contain letters, numbers, and underscores"
    );

    let (status, _) = send(&app, profile_form("ada").request("POST", "/api/profile/create")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, profile_form("ada").request("POST", "/api/profile/create")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Username already taken. Please choose a different one."
    );
}

#[tokio::test]
async fn upload_validation_is_enforced_at_the_route() {
    let (app, _, store) = test_app(true);

    let req = profile_form("ada")
        .file("profilePicture", "evil.sh", "text/x-sh", b"#!/bin/sh")
        .request("POST", "/api/profile/create");
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Only images, videos, APK files, and documents are allowed!"
    );
    assert_eq!(store.store_count(), 0);
}

#[tokio::test]
async fn login_and_authenticated_profile() {
    let (app, _, _) = test_app(true);

    let req = profile_form("ada")
        .text("password", "hunter22")
        .request("POST", "/api/profile/create");
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let req = json_request("POST", "/api/profile/login", json!({"username": "nobody", "password": "x"}));
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let req = json_request("POST", "/api/profile/login", json!({"username": "ada", "password": "wrong"}));
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");

    let req = json_request("POST", "/api/profile/login", json!({"username": "ada"}));
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username and password are required");

    let req = json_request("POST", "/api/profile/login", json!({"username": "ada", "password": "hunter22"}));
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let req = Request::builder()
        .uri("/api/profile")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "ada");

    let (status, _) = send(&app, get("/api/profile")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn forgot_password_resets_with_security_code() {
    let (app, _, _) = test_app(true);

    let req = profile_form("ada")
        .text("securityCode", "secret42")
        .text("password", "hunter22")
        .request("POST", "/api/profile/create");
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let req = json_request(
        "POST",
        "/api/profile/forgot-password",
        json!({"username": "ada", "securityCode": "secret42", "newPassword": "newpass1", "confirmPassword": "different"}),
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Passwords do not match");

    let req = json_request(
        "POST",
        "/api/profile/forgot-password",
        json!({"username": "ada", "securityCode": "wrong", "newPassword": "newpass1", "confirmPassword": "newpass1"}),
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid security code");

    let req = json_request(
        "POST",
        "/api/profile/forgot-password",
        json!({"username": "ada", "securityCode": "secret42", "newPassword": "newpass1", "confirmPassword": "newpass1"}),
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password updated successfully");

    let req = json_request("POST", "/api/profile/login", json!({"username": "ada", "password": "newpass1"}));
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let req = json_request("POST", "/api/profile/login", json!({"username": "ada", "password": "hunter22"}));
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn update_profile_replaces_highlights_wholesale() {
    let (app, _, _) = test_app(true);

    let (status, body) = send(&app, profile_form("ada").request("POST", "/api/profile/create")).await;
    assert_eq!(status, StatusCode::OK);
    let profile_id = body["profileId"].as_str().unwrap().to_string();

    // Keeping your own username is not a collision
    let req = json_request(
        "PUT",
        "/api/profile",
        json!({"profileId": profile_id, "name": "Countess", "username": "ada", "highlights": ["poetry", "mathematics"]}),
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Profile updated successfully");

    let (status, body) = send(&app, get(&format!("/api/profile/{}", profile_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Countess");
    let highlights = body["highlights"].as_array().unwrap();
    assert_eq!(highlights.len(), 2);
    assert_eq!(highlights[0]["highlight_text"], "poetry");
    assert_eq!(highlights[1]["highlight_text"], "mathematics");
}

#[tokio::test]
async fn replacing_profile_picture_discards_the_old_asset() {
    let (app, _, store) = test_app(true);

    let req = profile_form("ada")
        .file("profilePicture", "old.png", "image/png", b"old")
        .request("POST", "/api/profile/create");
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let profile_id = body["profileId"].as_str().unwrap().to_string();
    let old_public_id = store.stored()[0].public_id.clone();

    let req = Form::new()
        .text("profileId", &profile_id)
        .file("profilePicture", "new.png", "image/png", b"new")
        .request("POST", "/api/profile/picture");
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Profile picture updated successfully");
    assert_eq!(body["url"], store.stored()[1].url);
    assert_eq!(store.deleted(), vec![old_public_id]);

    let req = Form::new()
        .text("profileId", &profile_id)
        .request("POST", "/api/profile/picture");
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file uploaded");
}

#[tokio::test]
async fn content_item_defaults_and_lifecycle() {
    let (app, state, store) = test_app(true);

    // No profileId: legacy fallback to tenant 1
    let req = Form::new()
        .text("title", "Climbing")
        .text("description", "Weekends")
        .file("file", "wall.jpg", "image/jpeg", b"jpg")
        .request("POST", "/api/content/hobbies");
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hobby added successfully");
    let id = body["id"].as_i64().unwrap();

    let row = state.db.get_content_item(id, "hobby", 1).unwrap().unwrap();
    assert_eq!(row.icon.as_deref(), Some("fa-solid fa-heart"));
    assert_eq!(row.file_path.as_deref(), Some(store.stored()[0].url.as_str()));
    assert_eq!(row.file_type.as_deref(), Some("image"));

    // Skills take a `name` field and default to the cyan palette
    let req = Form::new()
        .text("name", "Rust")
        .request("POST", "/api/content/skills");
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Skill added successfully");
    let skill_id = body["id"].as_i64().unwrap();
    let skill = state.db.get_content_item(skill_id, "skill", 1).unwrap().unwrap();
    assert_eq!(skill.title.as_deref(), Some("Rust"));
    assert_eq!(skill.icon.as_deref(), Some("fa-solid fa-star"));
    assert_eq!(skill.color.as_deref(), Some("cyan-custom"));

    // Update with a replacement file: old asset discarded, new one stored
    let old_public_id = store.stored()[0].public_id.clone();
    let req = Form::new()
        .text("title", "Bouldering")
        .file("file", "boulder.jpg", "image/jpeg", b"jpg2")
        .request("PUT", &format!("/api/content/hobbies/{}", id));
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hobby updated successfully");
    assert_eq!(store.store_count(), 2);
    assert_eq!(store.deleted(), vec![old_public_id]);

    // Text-only update: no media traffic, attachment untouched
    let req = Form::new()
        .text("title", "Bouldering")
        .text("description", "Most weekends")
        .request("PUT", &format!("/api/content/hobbies/{}", id));
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.store_count(), 2);
    assert_eq!(store.delete_attempts(), 1);
    let row = state.db.get_content_item(id, "hobby", 1).unwrap().unwrap();
    assert_eq!(row.title.as_deref(), Some("Bouldering"));
    assert_eq!(row.file_path.as_deref(), Some(store.stored()[1].url.as_str()));

    let req = Form::new().request("PUT", "/api/content/hobbies/9999");
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Hobby not found");

    let req = Form::new().request("POST", "/api/content/gadgets");
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Unknown content category");

    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/api/content/hobbies/{}", id))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hobby deleted successfully");
    assert!(state.db.get_content_item(id, "hobby", 1).unwrap().is_none());
    assert_eq!(store.deleted().last().unwrap(), &store.stored()[1].public_id);
}

#[tokio::test]
async fn sections_crud_and_item_attachments() {
    let (app, _, store) = test_app(true);

    let req = json_request("POST", "/api/sections/section", json!({"name": "Books", "icon": "fa-book"}));
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let section_id = body["id"].as_i64().unwrap();
    assert_eq!(body["name"], "Books");

    let req = json_request(
        "PUT",
        &format!("/api/sections/section/{}", section_id),
        json!({"name": "Reading", "icon": "fa-book-open"}),
    );
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Section updated successfully");

    let req = json_request("PUT", "/api/sections/section/9999", json!({"name": "x"}));
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Section not found");

    let (status, body) = send(&app, get("/api/sections/sections")).await;
    assert_eq!(status, StatusCode::OK);
    let sections = body["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0]["name"], "Reading");

    // No files: attachment columns stay null
    let req = Form::new()
        .text("sectionId", &section_id.to_string())
        .text("title", "SICP")
        .request("POST", "/api/sections/section/item");
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["file_path"].is_null());
    assert!(body["file_type"].is_null());

    // Two files: stored as a JSON list tagged multiple
    let req = Form::new()
        .text("sectionId", &section_id.to_string())
        .text("title", "TAPL")
        .file("files", "cover.jpg", "image/jpeg", b"a")
        .file("files", "excerpt.pdf", "application/pdf", b"b")
        .request("POST", "/api/sections/section/item");
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["file_type"], "multiple");
    let refs: Vec<Value> = serde_json::from_str(body["file_path"].as_str().unwrap()).unwrap();
    assert_eq!(refs.len(), 2);
    assert_eq!(refs[0]["path"], store.stored()[0].url.as_str());
    assert_eq!(refs[0]["type"], "image");
    assert_eq!(refs[1]["type"], "document");

    let (status, body) = send(
        &app,
        get(&format!("/api/sections/section/items?sectionId={}", section_id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["items"][0]["title"], "SICP");

    let req = Form::new()
        .text("sectionId", "9999")
        .request("POST", "/api/sections/section/item");
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Section not found");

    let req = Form::new().text("title", "x").request("POST", "/api/sections/section/item");
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "sectionId is required");
}

#[tokio::test]
async fn item_update_keeps_listed_files_and_appends_new() {
    let (app, state, store) = test_app(true);

    let req = json_request("POST", "/api/sections/section", json!({"name": "Gallery"}));
    let (_, body) = send(&app, req).await;
    let section_id = body["id"].as_i64().unwrap();

    let req = Form::new()
        .text("sectionId", &section_id.to_string())
        .text("title", "Trip")
        .file("files", "a.jpg", "image/jpeg", b"a")
        .file("files", "b.jpg", "image/jpeg", b"b")
        .request("POST", "/api/sections/section/item");
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let item_id = body["id"].as_i64().unwrap();

    let url_a = store.stored()[0].url.clone();
    let url_b = store.stored()[1].url.clone();

    // Keep only A, drop B, append C. B must not be deleted from the host.
    let keep = json!([{"path": url_a, "type": "image"}]).to_string();
    let req = Form::new()
        .text("title", "Trip v2")
        .text("existingFiles", &keep)
        .file("files", "c.jpg", "image/jpeg", b"c")
        .request("PUT", &format!("/api/sections/section/item/{}", item_id));
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Item updated successfully");
    assert_eq!(store.delete_attempts(), 0);

    let row = state.db.get_section_item(item_id).unwrap().unwrap();
    assert_eq!(row.title.as_deref(), Some("Trip v2"));
    assert_eq!(row.file_type.as_deref(), Some("multiple"));
    let refs: Vec<Value> = serde_json::from_str(row.file_path.as_deref().unwrap()).unwrap();
    assert_eq!(refs.len(), 2);
    assert_eq!(refs[0]["path"], url_a.as_str());
    assert_eq!(refs[1]["path"], store.stored()[2].url.as_str());
    assert_ne!(refs[1]["path"], url_b.as_str());

    // Text-only update leaves the attachment list as it was
    let req = Form::new()
        .text("description", "Summer")
        .request("PUT", &format!("/api/sections/section/item/{}", item_id));
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let row = state.db.get_section_item(item_id).unwrap().unwrap();
    let refs: Vec<Value> = serde_json::from_str(row.file_path.as_deref().unwrap()).unwrap();
    assert_eq!(refs.len(), 2);

    let req = Form::new()
        .text("title", "x")
        .request("PUT", "/api/sections/section/item/9999");
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Item not found");
}

#[tokio::test]
async fn deleting_a_section_cascades_items_and_media() {
    let (app, state, store) = test_app(true);

    let req = json_request("POST", "/api/sections/section", json!({"name": "Clips"}));
    let (_, body) = send(&app, req).await;
    let section_id = body["id"].as_i64().unwrap();

    for name in ["one.mp4", "two.mp4"] {
        let req = Form::new()
            .text("sectionId", &section_id.to_string())
            .file("files", name, "video/mp4", b"v")
            .request("POST", "/api/sections/section/item");
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(store.store_count(), 2);

    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/api/sections/section/{}", section_id))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Section deleted");

    assert!(state.db.items_for_section(section_id).unwrap().is_empty());
    assert!(!state.db.section_exists(section_id).unwrap());
    let mut deleted = store.deleted();
    deleted.sort();
    let mut expected: Vec<String> = store.stored().iter().map(|m| m.public_id.clone()).collect();
    expected.sort();
    assert_eq!(deleted, expected);

    let req = Request::builder()
        .method("DELETE")
        .uri("/api/sections/section/9999")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Section not found");
}

#[tokio::test]
async fn sections_come_back_in_display_order() {
    let (app, state, _) = test_app(true);

    for name in ["first", "second", "third"] {
        let req = json_request("POST", "/api/sections/section", json!({"name": name}));
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
    }

    // Push the first section to the back
    state
        .db
        .with_conn(|conn| {
            conn.execute(
                "UPDATE sections SET section_order = 5 WHERE name = 'first'",
                [],
            )?;
            Ok(())
        })
        .unwrap();

    let (status, body) = send(&app, get("/api/sections/sections")).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["sections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["second", "third", "first"]);
}

#[tokio::test]
async fn memories_upload_list_and_delete() {
    let (app, _, store) = test_app(true);

    let req = Form::new()
        .text("caption", "nope")
        .request("POST", "/api/memories");
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file uploaded");

    let req = Form::new()
        .text("caption", "Sunset")
        .file("memory", "sunset.jpg", "image/jpeg", b"jpg")
        .request("POST", "/api/memories");
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Memory uploaded successfully");
    assert_eq!(body["file_type"], "image");
    let first_id = body["id"].as_i64().unwrap();

    let req = Form::new()
        .file("memory", "clip.mp4", "video/mp4", b"mp4")
        .request("POST", "/api/memories");
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["file_type"], "video");
    let second_id = body["id"].as_i64().unwrap();

    // Newest first; the later upload leads even within the same second
    let (status, body) = send(&app, get("/api/memories")).await;
    assert_eq!(status, StatusCode::OK);
    let memories = body["memories"].as_array().unwrap();
    assert_eq!(memories.len(), 2);
    assert_eq!(memories[0]["id"].as_i64().unwrap(), second_id);
    assert_eq!(memories[0]["caption"], "");
    assert_eq!(memories[1]["caption"], "Sunset");
    assert_eq!(memories[1]["original_name"], "sunset.jpg");

    let req = Request::builder()
        .method("DELETE")
        .uri("/api/memories/9999")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Memory not found");

    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/api/memories/{}", first_id))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Memory deleted successfully");
    assert_eq!(store.deleted(), vec![store.stored()[0].public_id.clone()]);

    let (_, body) = send(&app, get("/api/memories")).await;
    assert_eq!(body["memories"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn legacy_fallback_disabled_turns_unknown_tenants_into_404() {
    let (app, _, _) = test_app(false);

    let (status, body) = send(&app, get("/api/memories")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Profile not found");

    let (status, _) = send(&app, get("/api/memories?profileId=nosuchtenant")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // With the fallback on, the same requests land on the default tenant
    let (app, _, _) = test_app(true);
    let (status, body) = send(&app, get("/api/memories?profileId=nosuchtenant")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["memories"].as_array().unwrap().is_empty());
}
