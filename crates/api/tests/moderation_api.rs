//! Integration tests for the moderation endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    body_json, get, moderate, post_json, solution_upload, test_config, upload, TestApp,
    MODERATION_TOKEN,
};
use serde_json::json;

async fn pending_solution(app: &TestApp, crackme: &str, author: &str) -> String {
    let response = app
        .send(upload(
            &solution_upload(crackme, "solve.zip"),
            author,
            b"PK",
        ))
        .await;
    body_json(response).await["data"]["hexid"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn moderation_requires_token() {
    let app = TestApp::new().await;
    let crackme = app.visible_crackme("alice").await;
    let solution = pending_solution(&app, &crackme, "bob").await;
    let uri = format!("/api/v1/moderation/solution/{solution}/approve");

    let missing = app.send(moderate(Method::POST, &uri, None, None)).await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let wrong = app
        .send(moderate(Method::POST, &uri, Some("guess"), None))
        .await;
    assert_eq!(wrong.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn moderation_disabled_without_configured_token() {
    let mut config = test_config();
    config.moderation_token = None;
    let app = TestApp::with_config(config).await;

    let response = app
        .send(moderate(
            Method::POST,
            "/api/v1/moderation/crackme/507f1f77bcf86cd799439011/approve",
            Some(MODERATION_TOKEN),
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn approving_solution_counts_once() {
    let app = TestApp::new().await;
    let crackme = app.visible_crackme("alice").await;
    let solution = pending_solution(&app, &crackme, "bob").await;
    let uri = format!("/api/v1/moderation/solution/{solution}/approve");

    let response = app
        .send(moderate(Method::POST, &uri, Some(MODERATION_TOKEN), None))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["kind"], "solution");
    assert_eq!(json["data"]["state"], "visible");

    let again = app
        .send(moderate(Method::POST, &uri, Some(MODERATION_TOKEN), None))
        .await;
    assert_eq!(again.status(), StatusCode::BAD_REQUEST);

    let page = body_json(app.send(get(&format!("/api/v1/crackmes/{crackme}"), None)).await).await;
    assert_eq!(page["data"]["crackme"]["nb_solutions"], 1);
    assert_eq!(page["data"]["solutions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn reject_removes_file_and_notifies_with_reason() {
    let app = TestApp::new().await;
    let crackme = app.visible_crackme("alice").await;
    let solution = pending_solution(&app, &crackme, "bob").await;

    let response = app
        .send(moderate(
            Method::POST,
            &format!("/api/v1/moderation/solution/{solution}/reject"),
            Some(MODERATION_TOKEN),
            Some(json!({ "reason": "no writeup" })),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["state"], "deleted");
    assert_eq!(
        std::fs::read_dir(&app.storage.solution_root).unwrap().count(),
        0
    );

    let inbox = body_json(app.send(get("/api/v1/notifications", Some("bob"))).await).await;
    assert_eq!(
        inbox["data"][0]["message"],
        "Your solution for 'keygenme' has been rejected! Reason: no writeup"
    );
}

#[tokio::test]
async fn delete_comment_and_unknown_kind() {
    let app = TestApp::new().await;
    let crackme = app.visible_crackme("alice").await;
    let response = app
        .send(post_json(
            &format!("/api/v1/crackmes/{crackme}/comments"),
            Some("bob"),
            json!({ "content": "spam spam" }),
        ))
        .await;
    let comment = body_json(response).await["data"]["hexid"]
        .as_str()
        .unwrap()
        .to_string();

    let approve = app
        .send(moderate(
            Method::POST,
            &format!("/api/v1/moderation/comment/{comment}/approve"),
            Some(MODERATION_TOKEN),
            None,
        ))
        .await;
    assert_eq!(approve.status(), StatusCode::BAD_REQUEST);

    let delete = app
        .send(moderate(
            Method::DELETE,
            &format!("/api/v1/moderation/comment/{comment}"),
            Some(MODERATION_TOKEN),
            None,
        ))
        .await;
    assert_eq!(delete.status(), StatusCode::OK);

    let page = body_json(app.send(get(&format!("/api/v1/crackmes/{crackme}"), None)).await).await;
    assert_eq!(page["data"]["comments"], json!([]));

    let unknown = app
        .send(moderate(
            Method::DELETE,
            &format!("/api/v1/moderation/rating/{comment}"),
            Some(MODERATION_TOKEN),
            None,
        ))
        .await;
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_crackme_takes_its_children_along() {
    let app = TestApp::new().await;
    let crackme = app.visible_crackme("alice").await;
    let solved = pending_solution(&app, &crackme, "bob").await;
    app.send(moderate(
        Method::POST,
        &format!("/api/v1/moderation/solution/{solved}/approve"),
        Some(MODERATION_TOKEN),
        None,
    ))
    .await;
    let pending = pending_solution(&app, &crackme, "Zed").await;
    app.send(post_json(
        &format!("/api/v1/crackmes/{crackme}/comments"),
        Some("bob"),
        json!({ "content": "nice one" }),
    ))
    .await;
    app.send(post_json(
        &format!("/api/v1/crackmes/{crackme}/ratings"),
        Some("bob"),
        json!({ "kind": "quality", "rating": 4 }),
    ))
    .await;

    let response = app
        .send(moderate(
            Method::DELETE,
            &format!("/api/v1/moderation/crackme/{crackme}"),
            Some(MODERATION_TOKEN),
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let profile = body_json(app.send(get("/api/v1/users/bob", None)).await).await;
    assert_eq!(profile["data"]["solutions"], json!([]));
    assert_eq!(profile["data"]["nb_solutions"], 0);
    assert_eq!(profile["data"]["nb_comments"], 0);

    let stats = body_json(app.send(get("/api/v1/stats", None)).await).await;
    assert_eq!(stats["data"]["crackmes"], 0);

    // The pending solution lost its parent and can no longer be approved.
    let approve = app
        .send(moderate(
            Method::POST,
            &format!("/api/v1/moderation/solution/{pending}/approve"),
            Some(MODERATION_TOKEN),
            None,
        ))
        .await;
    assert_eq!(approve.status(), StatusCode::NOT_FOUND);
}
