//! Integration tests for the country endpoints.

mod helpers;

use http::StatusCode;
use http::header::{CACHE_CONTROL, LOCATION};

#[tokio::test]
async fn test_list_countries_default_page() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/country", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["items"].as_array().unwrap().len(), 3);
    assert_eq!(response.body["pageNumber"], 1);
    assert_eq!(response.body["totalItems"], 3);
    assert_eq!(response.body["totalPages"], 1);
    assert_eq!(response.body["items"][0]["shortName"], "JM");
}

#[tokio::test]
async fn test_list_countries_second_page() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("GET", "/api/country?pageNumber=2&pageSize=2", None, None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let items = response.body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Cayman Island");
    assert_eq!(response.body["totalPages"], 2);
    assert_eq!(response.body["hasPrevious"], true);
    assert_eq!(response.body["hasNext"], false);
}

#[tokio::test]
async fn test_list_countries_rejects_page_zero() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("GET", "/api/country?pageNumber=0", None, None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_kind(), Some("INVALID_ARGUMENT"));
}

#[tokio::test]
async fn test_list_countries_clamps_page_size() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("GET", "/api/country?pageSize=500", None, None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["pageSize"], 50);
}

#[tokio::test]
async fn test_get_country_includes_hotels() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/country/1", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "Jamaica");
    let hotels = response.body["hotels"].as_array().unwrap();
    assert_eq!(hotels.len(), 1);
    assert_eq!(hotels[0]["name"], "Sandals Resort and Spa");
}

#[tokio::test]
async fn test_get_country_missing_and_invalid_ids() {
    let app = helpers::TestApp::new().await;

    let missing = app.request("GET", "/api/country/999", None, None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let zero = app.request("GET", "/api/country/0", None, None).await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);

    let text = app.request("GET", "/api/country/abc", None, None).await;
    assert_eq!(text.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_country_requires_admin() {
    let app = helpers::TestApp::new().await;
    let body = serde_json::json!({ "name": "Barbados", "shortName": "BB" });

    let anonymous = app
        .request("POST", "/api/country", Some(body.clone()), None)
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let user_token = app.user_token().await;
    let plain_user = app
        .request("POST", "/api/country", Some(body), Some(&user_token))
        .await;
    assert_eq!(plain_user.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_country_returns_location() {
    let app = helpers::TestApp::new().await;
    let token = app.admin_token().await;

    let response = app
        .request(
            "POST",
            "/api/country",
            Some(serde_json::json!({ "name": "Barbados", "shortName": "BB" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["id"], 4);
    assert_eq!(response.headers[LOCATION], "/api/country/4");

    let fetched = app.request("GET", "/api/country/4", None, None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["shortName"], "BB");
    assert_eq!(fetched.body["hotels"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_country_validates_fields() {
    let app = helpers::TestApp::new().await;
    let token = app.admin_token().await;

    let response = app
        .request(
            "POST",
            "/api/country",
            Some(serde_json::json!({ "name": "Barbados", "shortName": "BRB" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_country() {
    let app = helpers::TestApp::new().await;
    let token = app.admin_token().await;
    let body = serde_json::json!({ "name": "Cayman Islands", "shortName": "KY" });

    let response = app
        .request("PUT", "/api/country/3", Some(body.clone()), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let fetched = app.request("GET", "/api/country/3", None, None).await;
    assert_eq!(fetched.body["name"], "Cayman Islands");
    assert_eq!(fetched.body["shortName"], "KY");

    let missing = app
        .request("PUT", "/api/country/999", Some(body), Some(&token))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_country_with_hotels_conflicts() {
    let app = helpers::TestApp::new().await;
    let token = app.admin_token().await;

    let response = app
        .request("DELETE", "/api/country/1", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    let still_there = app.request("GET", "/api/country/1", None, None).await;
    assert_eq!(still_there.status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_country() {
    let app = helpers::TestApp::new().await;
    let token = app.admin_token().await;

    let created = app
        .request(
            "POST",
            "/api/country",
            Some(serde_json::json!({ "name": "Barbados", "shortName": "BB" })),
            Some(&token),
        )
        .await;
    let id = created.body["id"].as_i64().unwrap();
    let path = format!("/api/country/{id}");

    let deleted = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = app.request("GET", &path, None, None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);

    let again = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_v2_lists_all_countries_unpaged() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/2.0/country", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    let countries = response.body.as_array().unwrap();
    assert_eq!(countries.len(), 3);
    assert_eq!(countries[1]["shortName"], "BS");
    assert_eq!(response.headers[CACHE_CONTROL], "public, max-age=120");
}

#[tokio::test]
async fn test_reads_carry_cache_control() {
    let app = helpers::TestApp::new().await;

    let list = app.request("GET", "/api/country", None, None).await;
    assert_eq!(list.headers[CACHE_CONTROL], "public, max-age=120");

    let one = app.request("GET", "/api/hotel/1", None, None).await;
    assert_eq!(one.status, StatusCode::OK);
    assert_eq!(one.headers[CACHE_CONTROL], "public, max-age=120");
}

#[tokio::test]
async fn test_errors_and_writes_are_not_cached() {
    let app = helpers::TestApp::new().await;
    let token = app.admin_token().await;

    let missing = app.request("GET", "/api/country/99", None, None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert!(missing.headers.get(CACHE_CONTROL).is_none());

    let created = app
        .request(
            "POST",
            "/api/country",
            Some(serde_json::json!({ "name": "Barbados", "shortName": "BB" })),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert!(created.headers.get(CACHE_CONTROL).is_none());
}
