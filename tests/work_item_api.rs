//! 工作项 API 的 HTTP 集成测试：经由父样本的归属限定

mod common;

use axum::http::StatusCode;
use common::{
    actions, build_test_app, create_sample, delete, get, id_of, patch, post, register,
    register_and_login,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

#[sqlx::test(migrations = "./migrations")]
async fn test_create_and_list_work_items(pool: PgPool) {
    let app = build_test_app(pool);
    let token = register_and_login(&app, "alice").await;
    let sample = create_sample(&app, &token, "S-100", "Plasma A").await;
    let base = format!("/api/samples/{}/work-items", id_of(&sample));

    let (status, json) = post(&app, &base, &token, json!({ "name": "Extraction" })).await;
    assert_eq!(status, StatusCode::OK);
    let task = &json["data"];
    assert_eq!(task["kind"], "Task");
    assert_eq!(task["status"], "Pending");
    assert_eq!(task["priority"], "Medium");
    assert_eq!(task["sample_id"], sample["id"]);

    let (status, json) = post(
        &app,
        &base,
        &token,
        json!({
            "name": "QC purity",
            "kind": "Test",
            "status": "In Progress",
            "priority": "High",
            "due_date": "2024-07-01",
            "result_numeric": 98.6,
            "result_text": "pass"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["kind"], "Test");
    assert_eq!(json["data"]["status"], "In Progress");
    assert_eq!(json["data"]["due_date"], "2024-07-01");
    assert_eq!(json["data"]["result_numeric"], 98.6);

    let (status, json) = get(&app, &base, &token).await;
    assert_eq!(status, StatusCode::OK);
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "Extraction");

    let (_, json) = get(&app, &format!("{base}?priority=High"), &token).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let (_, json) = get(&app, &format!("{base}?status=In%20Progress"), &token).await;
    assert_eq!(json["data"][0]["name"], "QC purity");

    let (_, json) = get(&app, &format!("{base}?status=Completed"), &token).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_under_foreign_sample_is_rejected(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let alice = register_and_login(&app, "alice").await;
    let bob = register_and_login(&app, "bob").await;
    let sample = create_sample(&app, &alice, "S-100", "Plasma A").await;
    let base = format!("/api/samples/{}/work-items", id_of(&sample));

    let (status, json) = post(&app, &base, &bob, json!({ "name": "Sneaky" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], 400);

    let (status, _) = post(
        &app,
        &format!("/api/samples/{}/work-items", Uuid::new_v4()),
        &bob,
        json!({ "name": "Orphan" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM work_items")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_foreign_work_items_are_invisible(pool: PgPool) {
    let app = build_test_app(pool);
    let alice = register_and_login(&app, "alice").await;
    let bob = register_and_login(&app, "bob").await;
    let sample = create_sample(&app, &alice, "S-100", "Plasma A").await;
    let base = format!("/api/samples/{}/work-items", id_of(&sample));
    let (_, json) = post(&app, &base, &alice, json!({ "name": "Extraction" })).await;
    let item_uri = format!("{base}/{}", id_of(&json["data"]));

    let (status, json) = get(&app, &base, &bob).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"].as_array().unwrap().is_empty());

    let (status, _) = get(&app, &item_uri, &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = patch(&app, &item_uri, &bob, json!({ "status": "Completed" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = delete(&app, &item_uri, &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = get(&app, &item_uri, &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "Pending");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_work_item_under_wrong_sample_is_not_found(pool: PgPool) {
    let app = build_test_app(pool);
    let token = register_and_login(&app, "alice").await;
    let first = create_sample(&app, &token, "S-1", "First").await;
    let second = create_sample(&app, &token, "S-2", "Second").await;
    let (_, json) = post(
        &app,
        &format!("/api/samples/{}/work-items", id_of(&first)),
        &token,
        json!({ "name": "Extraction" }),
    )
    .await;

    let uri = format!(
        "/api/samples/{}/work-items/{}",
        id_of(&second),
        id_of(&json["data"])
    );
    let (status, _) = get(&app, &uri, &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_and_delete_work_item(pool: PgPool) {
    let app = build_test_app(pool);
    let token = register_and_login(&app, "alice").await;
    let analyst = register(&app, "carol").await;
    let sample = create_sample(&app, &token, "S-100", "Plasma A").await;
    let base = format!("/api/samples/{}/work-items", id_of(&sample));
    let (_, json) = post(&app, &base, &token, json!({ "name": "Extraction" })).await;
    let item_uri = format!("{base}/{}", id_of(&json["data"]));

    let (status, json) = patch(
        &app,
        &item_uri,
        &token,
        json!({ "status": "Completed", "analyst_id": analyst["id"], "result_text": "ok" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "Completed");
    assert_eq!(json["data"]["analyst_id"], analyst["id"]);
    assert_eq!(json["data"]["name"], "Extraction");

    let (_, json) = get(
        &app,
        &format!("{base}?analyst_id={}", analyst["id"].as_str().unwrap()),
        &token,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    // 工作项状态与样本状态相互独立，工作项变更不产生审计记录
    let sample_uri = format!("/api/samples/{}", id_of(&sample));
    let (_, json) = get(&app, &sample_uri, &token).await;
    assert_eq!(json["data"]["status"], "Received");
    assert_eq!(actions(&json["data"]), vec!["Sample registered."]);

    let (status, _) = delete(&app, &item_uri, &token).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&app, &item_uri, &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, json) = get(&app, &sample_uri, &token).await;
    assert_eq!(actions(&json["data"]), vec!["Sample registered."]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_with_null_clears_optional_fields(pool: PgPool) {
    let app = build_test_app(pool);
    let token = register_and_login(&app, "alice").await;
    let analyst = register(&app, "carol").await;
    let sample = create_sample(&app, &token, "S-100", "Plasma A").await;
    let base = format!("/api/samples/{}/work-items", id_of(&sample));
    let (status, json) = post(
        &app,
        &base,
        &token,
        json!({
            "name": "QC purity",
            "kind": "Test",
            "due_date": "2024-06-01",
            "analyst_id": analyst["id"],
            "result_text": "pass",
            "result_numeric": 1.5
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let item_uri = format!("{base}/{}", id_of(&json["data"]));

    // 未提供的字段保持不变
    let (status, json) = patch(&app, &item_uri, &token, json!({ "status": "Completed" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["analyst_id"], analyst["id"]);
    assert_eq!(json["data"]["due_date"], "2024-06-01");
    assert_eq!(json["data"]["result_text"], "pass");
    assert_eq!(json["data"]["result_numeric"], 1.5);

    let (status, json) = patch(
        &app,
        &item_uri,
        &token,
        json!({
            "analyst_id": null,
            "due_date": null,
            "result_text": null,
            "result_numeric": null
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["analyst_id"].is_null());
    assert!(json["data"]["due_date"].is_null());
    assert!(json["data"]["result_text"].is_null());
    assert!(json["data"]["result_numeric"].is_null());
    assert_eq!(json["data"]["status"], "Completed");

    let (_, json) = get(&app, &item_uri, &token).await;
    assert!(json["data"]["analyst_id"].is_null());
    assert!(json["data"]["result_numeric"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_work_item_validation(pool: PgPool) {
    let app = build_test_app(pool);
    let token = register_and_login(&app, "alice").await;
    let sample = create_sample(&app, &token, "S-100", "Plasma A").await;
    let base = format!("/api/samples/{}/work-items", id_of(&sample));

    let (status, _) = post(&app, &base, &token, json!({ "name": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &app,
        &base,
        &token,
        json!({ "name": "QC", "result_text": "x".repeat(256) }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &app,
        &base,
        &token,
        json!({ "name": "QC", "analyst_id": Uuid::new_v4() }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(&app, &base, &token, json!({ "name": "QC", "priority": "Urgent" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
