//! HTTP-level behavior: authentication, status mapping, and the JSON
//! surface of the reminder and calendar endpoints.

use chrono::{TimeDelta, Utc};
use salvo::http::StatusCode;
use salvo::test::{ResponseExt, TestClient};

use pawtrack_test::component::store::memory::MemoryStore;

use crate::helpers::{USER_HEADER, http_service, open_services, reminder_body, todo_body};

const BASE: &str = "http://127.0.0.1:5800";

fn url(path: &str) -> String {
    format!("{BASE}/api{path}")
}

#[test_log::test(tokio::test)]
async fn healthcheck_needs_no_auth() {
    let store = MemoryStore::new();
    let service = http_service(open_services(&store));

    let mut res = TestClient::get(url("/healthcheck")).send(&service).await;
    assert_eq!(res.status_code, Some(StatusCode::OK));
    assert_eq!(res.take_string().await.expect("body"), "OK");
}

#[test_log::test(tokio::test)]
async fn missing_identity_is_unauthorized() {
    let store = MemoryStore::new();
    let service = http_service(open_services(&store));

    let res = TestClient::get(url("/calendar")).send(&service).await;
    assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
}

#[test_log::test(tokio::test)]
async fn malformed_identity_header_is_rejected() {
    let store = MemoryStore::new();
    let service = http_service(open_services(&store));

    let res = TestClient::get(url("/calendar"))
        .add_header(USER_HEADER, "not-a-uuid", true)
        .send(&service)
        .await;
    assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
}

#[test_log::test(tokio::test)]
async fn create_complete_and_list_round_trip() {
    let store = MemoryStore::new();
    let service = http_service(open_services(&store));
    let user = uuid::Uuid::new_v4();

    let mut body = reminder_body("walk the dog", Utc::now() + TimeDelta::hours(1));
    body["repeat_rule"] = serde_json::json!("FREQ=DAILY");

    let mut created_res = TestClient::post(url("/reminders"))
        .add_header(USER_HEADER, user.to_string(), true)
        .json(&body)
        .send(&service)
        .await;
    assert_eq!(created_res.status_code, Some(StatusCode::CREATED));
    let created: serde_json::Value = created_res.take_json().await.expect("json");
    assert_eq!(created["status"], "pending");
    let id = created["id"].as_str().expect("id");

    let mut completed_res = TestClient::post(url(&format!("/reminders/{id}/complete")))
        .add_header(USER_HEADER, user.to_string(), true)
        .send(&service)
        .await;
    assert_eq!(completed_res.status_code, Some(StatusCode::OK));
    let completed: serde_json::Value = completed_res.take_json().await.expect("json");
    assert_eq!(completed["status"], "done");

    // The successor materialized by the completion shows up in the list.
    let mut list_res = TestClient::get(url("/calendar?status=pending"))
        .add_header(USER_HEADER, user.to_string(), true)
        .send(&service)
        .await;
    assert_eq!(list_res.status_code, Some(StatusCode::OK));
    let page: serde_json::Value = list_res.take_json().await.expect("json");
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["item_kind"], "pet_reminder");
    assert_eq!(page["items"][0]["title"], "walk the dog");
}

#[test_log::test(tokio::test)]
async fn past_dated_creation_is_a_validation_error() {
    let store = MemoryStore::new();
    let service = http_service(open_services(&store));
    let user = uuid::Uuid::new_v4();

    let res = TestClient::post(url("/reminders"))
        .add_header(USER_HEADER, user.to_string(), true)
        .json(&reminder_body("too late", Utc::now() - TimeDelta::hours(1)))
        .send(&service)
        .await;
    assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
}

#[test_log::test(tokio::test)]
async fn foreign_reminders_are_forbidden_and_hidden() {
    let store = MemoryStore::new();
    let service = http_service(open_services(&store));
    let owner = uuid::Uuid::new_v4();
    let stranger = uuid::Uuid::new_v4();

    let mut created_res = TestClient::post(url("/reminders"))
        .add_header(USER_HEADER, owner.to_string(), true)
        .json(&reminder_body("private", Utc::now() + TimeDelta::hours(1)))
        .send(&service)
        .await;
    let created: serde_json::Value = created_res.take_json().await.expect("json");
    let id = created["id"].as_str().expect("id");

    // A pet co-owner is still not the item's owner: completion is refused.
    let res = TestClient::post(url(&format!("/reminders/{id}/complete")))
        .add_header(USER_HEADER, stranger.to_string(), true)
        .send(&service)
        .await;
    assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

    // And the stranger's calendar stays empty.
    let mut list_res = TestClient::get(url("/calendar"))
        .add_header(USER_HEADER, stranger.to_string(), true)
        .send(&service)
        .await;
    let page: serde_json::Value = list_res.take_json().await.expect("json");
    assert_eq!(page["total"], 0);
}

#[test_log::test(tokio::test)]
async fn unknown_targets_are_not_found() {
    let store = MemoryStore::new();
    let service = http_service(open_services(&store));
    let user = uuid::Uuid::new_v4();

    let missing = uuid::Uuid::new_v4();
    let res = TestClient::post(url(&format!("/reminders/{missing}/complete")))
        .add_header(USER_HEADER, user.to_string(), true)
        .send(&service)
        .await;
    assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
}

#[test_log::test(tokio::test)]
async fn deleted_reminders_vanish_from_the_api() {
    let store = MemoryStore::new();
    let service = http_service(open_services(&store));
    let user = uuid::Uuid::new_v4();

    let mut created_res = TestClient::post(url("/reminders"))
        .add_header(USER_HEADER, user.to_string(), true)
        .json(&reminder_body("short lived", Utc::now() + TimeDelta::hours(1)))
        .send(&service)
        .await;
    let created: serde_json::Value = created_res.take_json().await.expect("json");
    let id = created["id"].as_str().expect("id");

    let delete_res = TestClient::delete(url(&format!("/reminders/{id}")))
        .add_header(USER_HEADER, user.to_string(), true)
        .send(&service)
        .await;
    assert_eq!(delete_res.status_code, Some(StatusCode::NO_CONTENT));

    let res = TestClient::post(url(&format!("/reminders/{id}/complete")))
        .add_header(USER_HEADER, user.to_string(), true)
        .send(&service)
        .await;
    assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

    // The audit store still has the row.
    assert_eq!(store.reminder_rows().await, 1);
}

#[test_log::test(tokio::test)]
async fn unknown_filter_values_fail_before_any_query() {
    let store = MemoryStore::new();
    let service = http_service(open_services(&store));
    let user = uuid::Uuid::new_v4();

    for query in [
        "status=someday",
        "item_kind=vet_visit",
        "start_date=yesterday",
        "limit=minus-one",
    ] {
        let res = TestClient::get(url(&format!("/calendar?{query}")))
            .add_header(USER_HEADER, user.to_string(), true)
            .send(&service)
            .await;
        assert_eq!(
            res.status_code,
            Some(StatusCode::BAD_REQUEST),
            "query: {query}"
        );
    }
}

#[test_log::test(tokio::test)]
async fn batch_complete_reports_partial_failures() {
    let store = MemoryStore::new();
    let service = http_service(open_services(&store));
    let user = uuid::Uuid::new_v4();

    let mut created_res = TestClient::post(url("/reminders"))
        .add_header(USER_HEADER, user.to_string(), true)
        .json(&reminder_body("batched", Utc::now() + TimeDelta::hours(1)))
        .send(&service)
        .await;
    let created: serde_json::Value = created_res.take_json().await.expect("json");
    let id = created["id"].as_str().expect("id");
    let missing = uuid::Uuid::new_v4();

    let mut res = TestClient::post(url("/reminders/batch-complete"))
        .add_header(USER_HEADER, user.to_string(), true)
        .json(&serde_json::json!({ "ids": [id, id, missing] }))
        .send(&service)
        .await;
    assert_eq!(res.status_code, Some(StatusCode::OK));
    let outcome: serde_json::Value = res.take_json().await.expect("json");
    assert_eq!(outcome["completed"].as_array().expect("completed").len(), 1);
    assert_eq!(outcome["failures"].as_array().expect("failures").len(), 1);
    assert_eq!(outcome["failures"][0]["id"], missing.to_string());
}

#[test_log::test(tokio::test)]
async fn stats_roll_up_both_sources() {
    let store = MemoryStore::new();
    let service = http_service(open_services(&store));
    let user = uuid::Uuid::new_v4();

    TestClient::post(url("/reminders"))
        .add_header(USER_HEADER, user.to_string(), true)
        .json(&reminder_body("feed cat", Utc::now() + TimeDelta::hours(1)))
        .send(&service)
        .await;

    let mut todo_res = TestClient::post(url("/todos"))
        .add_header(USER_HEADER, user.to_string(), true)
        .json(&todo_body("order food"))
        .send(&service)
        .await;
    assert_eq!(todo_res.status_code, Some(StatusCode::CREATED));
    let todo: serde_json::Value = todo_res.take_json().await.expect("json");
    let todo_id = todo["id"].as_str().expect("id");

    let mut complete_res = TestClient::post(url(&format!("/todos/{todo_id}/complete")))
        .add_header(USER_HEADER, user.to_string(), true)
        .send(&service)
        .await;
    assert_eq!(complete_res.status_code, Some(StatusCode::OK));
    let completed: serde_json::Value = complete_res.take_json().await.expect("json");
    assert!(completed["completed_at"].is_string());

    let mut stats_res = TestClient::get(url("/calendar/stats"))
        .add_header(USER_HEADER, user.to_string(), true)
        .send(&service)
        .await;
    assert_eq!(stats_res.status_code, Some(StatusCode::OK));
    let stats: serde_json::Value = stats_res.take_json().await.expect("json");
    assert_eq!(stats["pending"], 1);
    assert_eq!(stats["done"], 1);
    assert_eq!(stats["todos"], 1);
    assert_eq!(stats["reminders"], 1);
}
