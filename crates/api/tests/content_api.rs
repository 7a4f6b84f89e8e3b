//! Integration tests for the public content endpoints: pages, uploads,
//! comments, users, stats and the notification inbox.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    body_json, get, moderate, post_json, solution_upload, upload, upload_declared, TestApp,
    CRACKME_UPLOAD, MODERATION_TOKEN,
};
use crackmes_core::storage::MAX_UPLOAD_BYTES;
use serde_json::json;

// ---------------------------------------------------------------------------
// Crackmes and comments
// ---------------------------------------------------------------------------

#[tokio::test]
async fn uploaded_crackme_is_hidden_until_approved() {
    let app = TestApp::new().await;
    let response = app
        .send(upload(
            CRACKME_UPLOAD,
            "alice",
            b"MZ",
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["visible"], false);
    assert_eq!(json["data"]["filename"], "keygenme.zip");
    let hexid = json["data"]["hexid"].as_str().unwrap().to_string();

    let page = app.send(get(&format!("/api/v1/crackmes/{hexid}"), None)).await;
    assert_eq!(page.status(), StatusCode::NOT_FOUND);

    app.send(moderate(
        Method::POST,
        &format!("/api/v1/moderation/crackme/{hexid}/approve"),
        Some(MODERATION_TOKEN),
        None,
    ))
    .await;
    let page = app.send(get(&format!("/api/v1/crackmes/{hexid}"), None)).await;
    assert_eq!(page.status(), StatusCode::OK);
    let json = body_json(page).await;
    assert_eq!(json["data"]["crackme"]["name"], "keygenme");
    assert_eq!(json["data"]["solutions"], json!([]));
}

#[tokio::test]
async fn comment_is_visible_and_counted() {
    let app = TestApp::new().await;
    let hexid = app.visible_crackme("alice").await;

    let response = app
        .send(post_json(
            &format!("/api/v1/crackmes/{hexid}/comments"),
            Some("bob"),
            json!({ "content": "nice one" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let comment = body_json(response).await;
    assert_eq!(comment["data"]["visible"], true);
    assert_eq!(comment["data"]["author"], "bob");

    let json = body_json(app.send(get(&format!("/api/v1/crackmes/{hexid}"), None)).await).await;
    assert_eq!(json["data"]["crackme"]["nb_comments"], 1);
    assert_eq!(json["data"]["comments"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn comment_requires_known_exact_identity() {
    let app = TestApp::new().await;
    let hexid = app.visible_crackme("alice").await;
    let uri = format!("/api/v1/crackmes/{hexid}/comments");

    let missing = app
        .send(post_json(&uri, None, json!({ "content": "hello" })))
        .await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let wrong_case = app
        .send(post_json(&uri, Some("Bob"), json!({ "content": "hello" })))
        .await;
    assert_eq!(wrong_case.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn short_comment_rejected() {
    let app = TestApp::new().await;
    let hexid = app.visible_crackme("alice").await;
    let response = app
        .send(post_json(
            &format!("/api/v1/crackmes/{hexid}/comments"),
            Some("bob"),
            json!({ "content": " a " }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Solutions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn second_solution_is_a_conflict() {
    let app = TestApp::new().await;
    let hexid = app.visible_crackme("alice").await;
    let uri = solution_upload(&hexid, "solve.zip");

    let first = app.send(upload(&uri, "bob", b"PK\x03\x04")).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(body_json(first).await["data"]["visible"], false);

    let second = app.send(upload(&uri, "bob", b"PK\x03\x04")).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(second).await["error"],
        "You already submitted a solution to this crackme"
    );
    assert_eq!(
        std::fs::read_dir(&app.storage.solution_root).unwrap().count(),
        1
    );
}

#[tokio::test]
async fn oversized_declaration_rejected() {
    let app = TestApp::new().await;
    let hexid = app.visible_crackme("alice").await;

    let response = app
        .send(upload_declared(
            &solution_upload(&hexid, "solve.zip"),
            "bob",
            b"tiny",
            MAX_UPLOAD_BYTES + 1,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        std::fs::read_dir(&app.storage.solution_root).unwrap().count(),
        0
    );
}

#[tokio::test]
async fn crackme_upload_needs_its_details() {
    let app = TestApp::new().await;
    let response = app
        .send(upload(
            "/api/v1/crackmes?name=keygenme&filename=keygenme.zip&arch=x86-64&platform=Linux",
            "alice",
            b"MZ",
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Missing query parameter 'lang'"
    );

    let response = app
        .send(upload(
            &format!("{CRACKME_UPLOAD}&info=patch%20the%20serial%20check"),
            "alice",
            b"MZ",
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["lang"], "C");
    assert_eq!(json["data"]["platform"], "Linux");
    assert_eq!(json["data"]["info"], "patch the serial check");
}

#[tokio::test]
async fn solution_writeup_is_required() {
    let app = TestApp::new().await;
    let hexid = app.visible_crackme("alice").await;

    let missing = app
        .send(upload(
            &format!("/api/v1/crackmes/{hexid}/solutions?filename=solve.zip"),
            "bob",
            b"PK",
        ))
        .await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let short = app
        .send(upload(
            &format!("/api/v1/crackmes/{hexid}/solutions?filename=solve.zip&info=nop"),
            "bob",
            b"PK",
        ))
        .await;
    assert_eq!(short.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(short).await["code"], "VALIDATION_ERROR");
    assert_eq!(
        std::fs::read_dir(&app.storage.solution_root).unwrap().count(),
        0
    );
}

#[tokio::test]
async fn upload_without_filename_is_bad_request() {
    let app = TestApp::new().await;
    let hexid = app.visible_crackme("alice").await;

    let response = app
        .send(upload(
            &format!("/api/v1/crackmes/{hexid}/solutions"),
            "bob",
            b"data",
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn traversal_filename_is_sanitized() {
    let app = TestApp::new().await;
    let hexid = app.visible_crackme("alice").await;

    let response = app
        .send(upload(
            &solution_upload(&hexid, "..%2F..%2Fetc%2Fpasswd"),
            "bob",
            b"root:x",
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["filename"], "passwd");

    let stored = app.storage.solution_root.join(format!(
        "bob+++{}+++passwd",
        json["data"]["hexid"].as_str().unwrap()
    ));
    assert!(stored.exists());
}

// ---------------------------------------------------------------------------
// Ratings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rating_updates_average_once_per_kind() {
    let app = TestApp::new().await;
    let hexid = app.visible_crackme("alice").await;
    let uri = format!("/api/v1/crackmes/{hexid}/ratings");

    let first = app
        .send(post_json(&uri, Some("bob"), json!({ "kind": "difficulty", "rating": 4 })))
        .await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let json = body_json(first).await;
    assert_eq!(json["data"]["rating"]["kind"], "difficulty");
    assert_eq!(json["data"]["summary"]["count"], 1);

    let again = app
        .send(post_json(&uri, Some("bob"), json!({ "kind": "difficulty", "rating": 2 })))
        .await;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let other_kind = app
        .send(post_json(&uri, Some("bob"), json!({ "kind": "quality", "rating": 5 })))
        .await;
    assert_eq!(other_kind.status(), StatusCode::CREATED);

    app.send(post_json(&uri, Some("Zed"), json!({ "kind": "difficulty", "rating": 2 })))
        .await;

    let page = body_json(app.send(get(&format!("/api/v1/crackmes/{hexid}"), None)).await).await;
    assert_eq!(page["data"]["crackme"]["difficulty"], 3.0);
    assert_eq!(page["data"]["crackme"]["quality"], 5.0);
}

#[tokio::test]
async fn bad_rating_rejected() {
    let app = TestApp::new().await;
    let hexid = app.visible_crackme("alice").await;
    let uri = format!("/api/v1/crackmes/{hexid}/ratings");

    let out_of_range = app
        .send(post_json(&uri, Some("bob"), json!({ "kind": "quality", "rating": 9 })))
        .await;
    assert_eq!(out_of_range.status(), StatusCode::BAD_REQUEST);

    let unknown_kind = app
        .send(post_json(&uri, Some("bob"), json!({ "kind": "fun", "rating": 3 })))
        .await;
    assert_eq!(unknown_kind.status(), StatusCode::BAD_REQUEST);

    let hidden = app
        .send(post_json(
            "/api/v1/crackmes/507f1f77bcf86cd799439011/ratings",
            Some("bob"),
            json!({ "kind": "quality", "rating": 3 }),
        ))
        .await;
    assert_eq!(hidden.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Users and stats
// ---------------------------------------------------------------------------

#[tokio::test]
async fn users_listed_in_byte_order() {
    let app = TestApp::new().await;
    let json = body_json(app.send(get("/api/v1/users", None)).await).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Zed", "alice", "bob"]);
    assert!(json["data"][0].get("email").is_none());
    assert!(json["data"][0].get("password").is_none());
}

#[tokio::test]
async fn profile_lookup_is_case_sensitive() {
    let app = TestApp::new().await;
    app.visible_crackme("alice").await;

    let response = app.send(get("/api/v1/users/alice", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["nb_crackmes"], 1);
    assert_eq!(json["data"]["crackmes"].as_array().unwrap().len(), 1);

    let response = app.send(get("/api/v1/users/Alice", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stats_report_totals() {
    let app = TestApp::new().await;
    app.visible_crackme("alice").await;

    let json = body_json(app.send(get("/api/v1/stats", None)).await).await;
    assert_eq!(json["data"]["users"], 3);
    assert_eq!(json["data"]["crackmes"], 1);
}

#[tokio::test]
async fn unavailable_store_returns_503() {
    let app = TestApp::new().await;
    app.store.set_unavailable(true);

    let response = app.send(get("/api/v1/stats", None)).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "SERVICE_UNAVAILABLE");
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[tokio::test]
async fn inbox_flow() {
    let app = TestApp::new().await;
    let hexid = app.visible_crackme("alice").await;
    app.send(post_json(
        &format!("/api/v1/crackmes/{hexid}/comments"),
        Some("bob"),
        json!({ "content": "nice one" }),
    ))
    .await;

    let json = body_json(app.send(get("/api/v1/notifications", Some("alice"))).await).await;
    let inbox = json["data"].as_array().unwrap();
    assert_eq!(inbox.len(), 3);
    assert_eq!(
        inbox[0]["message"],
        "New comment on your crackme 'keygenme' by: bob"
    );
    let newest = inbox[0]["hexid"].as_str().unwrap().to_string();

    let json = body_json(
        app.send(get("/api/v1/notifications/unseen-count", Some("alice")))
            .await,
    )
    .await;
    assert_eq!(json["data"]["unseen"], 3);

    let response = app
        .send(post_json(
            "/api/v1/notifications/seen",
            Some("alice"),
            json!({}),
        ))
        .await;
    assert_eq!(body_json(response).await["data"]["marked_seen"], 3);

    // Someone else's notification is invisible to bob.
    let response = app
        .send(
            axum::http::Request::builder()
                .method(Method::DELETE)
                .uri(format!("/api/v1/notifications/{newest}"))
                .header("x-auth-user", "bob")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .send(
            axum::http::Request::builder()
                .method(Method::DELETE)
                .uri(format!("/api/v1/notifications/{newest}"))
                .header("x-auth-user", "alice")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
