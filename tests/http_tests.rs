#![cfg(feature = "http")]

use actix_web::{test, web, App};
use roster_db::network::http_server::{handle_get, handle_post, ServerState};
use roster_db::{Roster, RosterConfig};
use serde_json::Value as JsonValue;
use std::sync::Arc;

const COLLECTION: &str = "users";

fn test_state() -> (tempfile::TempDir, web::Data<ServerState>) {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = RosterConfig::with_path(temp_dir.path().join("http.db"));
    let db = Arc::new(Roster::with_config(config).unwrap());
    let state = web::Data::new(ServerState {
        db,
        collection: COLLECTION.to_string(),
    });
    (temp_dir, state)
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .route("/", web::get().to(handle_get))
                .route("/", web::post().to(handle_post)),
        )
        .await
    };
}

// {"name":"Ada","year":2024}, percent-encoded for a query parameter
const ADA_USERDATA: &str = "%7B%22name%22%3A%22Ada%22%2C%22year%22%3A2024%7D";

#[actix_web::test]
async fn malformed_id_rejected_before_dispatch() {
    let (_dir, state) = test_state();
    let app = test_app!(state);

    for uri in [
        "/?requestType=allData&id=short",
        "/?requestType=basicData",
        "/?requestType=specificData&id=far-too-long-id&field=year",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let body: JsonValue = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["type"], "error");
        assert_eq!(body["reason"], "Invalid ID provided", "uri: {}", uri);
    }
}

#[actix_web::test]
async fn add_then_read_round_trip() {
    let (_dir, state) = test_state();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/?requestType=addUser&userdata={}", ADA_USERDATA))
        .to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["type"], "success");
    assert_eq!(body["reason"], "");
    let id = body["data"]["id"].as_str().expect("insert returns the id");
    assert_eq!(id.len(), 8);

    let req = test::TestRequest::get()
        .uri(&format!("/?requestType=allData&id={}", id))
        .to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["type"], "success");
    assert_eq!(body["data"]["name"], "Ada");
    assert_eq!(body["data"]["year"], 2024);
    assert!(
        body["data"].get("id").is_none(),
        "payloads never echo the id"
    );
}

#[actix_web::test]
async fn unknown_request_type_is_an_error_envelope() {
    let (_dir, state) = test_state();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/?requestType=dropAllUsers")
        .to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["type"], "error");
    assert!(body["reason"]
        .as_str()
        .unwrap()
        .contains("dropAllUsers"));
}

#[actix_web::test]
async fn edit_and_delete_report_store_errors_as_envelopes() {
    let (_dir, state) = test_state();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/?requestType=deleteUser&id=zzzzzzzz")
        .to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["type"], "error");
    assert_eq!(body["reason"], "No entries with ID zzzzzzzz found");

    let req = test::TestRequest::post()
        .uri("/?requestType=editUser&id=zzzzzzzz&field=year&value=2024")
        .to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["type"], "error");
    assert_eq!(body["reason"], "No entries with ID zzzzzzzz found");
}

#[actix_web::test]
async fn edit_then_read_back() {
    let (_dir, state) = test_state();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/?requestType=addUser&userdata={}", ADA_USERDATA))
        .to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!(
            "/?requestType=editUser&id={}&field=home&value=Hanover",
            id
        ))
        .to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["type"], "success");
    assert_eq!(body["reason"], "");
    assert!(body.get("data").is_none(), "write successes carry no data");

    let req = test::TestRequest::get()
        .uri(&format!("/?requestType=basicData&id={}", id))
        .to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["home"], "Hanover");
    assert_eq!(body["data"]["name"], "Ada");
    assert!(
        body["data"].get("picture").is_none(),
        "missing basic fields are absent, not errors"
    );
}

#[actix_web::test]
async fn frequency_endpoint_reports_percentages() {
    let (_dir, state) = test_state();
    let app = test_app!(state);

    for userdata in [
        "%7B%22year%22%3A2021%7D",
        "%7B%22year%22%3A2021%7D",
        "%7B%22year%22%3A2022%7D",
    ] {
        let req = test::TestRequest::post()
            .uri(&format!("/?requestType=addUser&userdata={}", userdata))
            .to_request();
        let body: JsonValue = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["type"], "success");
    }

    let req = test::TestRequest::get()
        .uri("/?requestType=frequency&field=year")
        .to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["type"], "success");
    assert_eq!(body["data"]["2021"]["frequency"], 2);
    assert_eq!(body["data"]["2021"]["percentage"], "66.7%");
    assert_eq!(body["data"]["2022"]["frequency"], 1);
    assert_eq!(body["data"]["2022"]["percentage"], "33.3%");
}

#[actix_web::test]
async fn users_by_field_returns_matches_without_ids() {
    let (_dir, state) = test_state();
    let app = test_app!(state);

    for userdata in [
        "%7B%22name%22%3A%22Ada%22%2C%22year%22%3A2024%7D",
        "%7B%22name%22%3A%22Alan%22%2C%22year%22%3A2024%7D",
        "%7B%22name%22%3A%22Grace%22%2C%22year%22%3A2025%7D",
    ] {
        let req = test::TestRequest::post()
            .uri(&format!("/?requestType=addUser&userdata={}", userdata))
            .to_request();
        let body: JsonValue = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["type"], "success");
    }

    let req = test::TestRequest::get()
        .uri("/?requestType=usersByField&field=year&value=2024")
        .to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["type"], "success");
    let matched = body["data"].as_array().unwrap();
    assert_eq!(matched.len(), 2);
    for record in matched {
        assert_eq!(record["year"], 2024);
        assert!(record.get("id").is_none());
    }
}

#[actix_web::test]
async fn bad_userdata_rejected() {
    let (_dir, state) = test_state();
    let app = test_app!(state);

    // not JSON at all
    let req = test::TestRequest::post()
        .uri("/?requestType=addUser&userdata=notjson")
        .to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["type"], "error");
    assert_eq!(body["reason"], "Invalid user data");

    // a JSON array is not a user object
    let req = test::TestRequest::post()
        .uri("/?requestType=addUser&userdata=%5B1%2C2%5D")
        .to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["type"], "error");
    assert_eq!(body["reason"], "Invalid user data");
}
