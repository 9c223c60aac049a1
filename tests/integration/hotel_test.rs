//! Integration tests for the hotel endpoints.

mod helpers;

use http::StatusCode;
use http::header::LOCATION;

#[tokio::test]
async fn test_list_hotels() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/hotel", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    let hotels = response.body.as_array().unwrap();
    assert_eq!(hotels.len(), 3);
    assert_eq!(hotels[0]["name"], "Sandals Resort and Spa");
    assert!(hotels[0].get("country").is_none());
}

#[tokio::test]
async fn test_get_hotel_includes_country() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/hotel/2", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "Comfort Suites");
    assert_eq!(response.body["countryId"], 3);
    assert_eq!(response.body["country"]["shortName"], "CI");
}

#[tokio::test]
async fn test_get_missing_hotel() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/hotel/42", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_kind(), Some("NOT_FOUND"));
}

#[tokio::test]
async fn test_create_hotel() {
    let app = helpers::TestApp::new().await;
    let token = app.admin_token().await;

    let response = app
        .request(
            "POST",
            "/api/hotel",
            Some(serde_json::json!({
                "name": "Half Moon",
                "address": "Montego Bay",
                "rating": 4.8,
                "countryId": 1,
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["id"], 4);
    assert_eq!(response.headers[LOCATION], "/api/hotel/4");

    let jamaica = app.request("GET", "/api/country/1", None, None).await;
    assert_eq!(jamaica.body["hotels"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_hotel_with_unknown_country_conflicts() {
    let app = helpers::TestApp::new().await;
    let token = app.admin_token().await;

    let response = app
        .request(
            "POST",
            "/api/hotel",
            Some(serde_json::json!({
                "name": "Nowhere Inn",
                "address": "Atlantis",
                "rating": 3.0,
                "countryId": 99,
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);

    let listed = app.request("GET", "/api/hotel", None, None).await;
    assert_eq!(listed.body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_create_hotel_rejects_out_of_range_rating() {
    let app = helpers::TestApp::new().await;
    let token = app.admin_token().await;

    let response = app
        .request(
            "POST",
            "/api/hotel",
            Some(serde_json::json!({
                "name": "Overrated",
                "address": "Negril Beach",
                "rating": 6.0,
                "countryId": 1,
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_hotel_moves_country() {
    let app = helpers::TestApp::new().await;
    let token = app.admin_token().await;

    let response = app
        .request(
            "PUT",
            "/api/hotel/3",
            Some(serde_json::json!({
                "name": "Grand Palladium",
                "address": "Nassau",
                "rating": 4.1,
                "countryId": 1,
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let fetched = app.request("GET", "/api/hotel/3", None, None).await;
    assert_eq!(fetched.body["name"], "Grand Palladium");
    assert_eq!(fetched.body["country"]["name"], "Jamaica");
}

#[tokio::test]
async fn test_plain_user_cannot_delete_hotel() {
    let app = helpers::TestApp::new().await;
    let token = app.user_token().await;

    let response = app
        .request("DELETE", "/api/hotel/1", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_hotel_unblocks_country_delete() {
    let app = helpers::TestApp::new().await;
    let token = app.admin_token().await;

    let deleted = app
        .request("DELETE", "/api/hotel/2", None, Some(&token))
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let missing = app
        .request("DELETE", "/api/hotel/2", None, Some(&token))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let country = app
        .request("DELETE", "/api/country/3", None, Some(&token))
        .await;
    assert_eq!(country.status, StatusCode::NO_CONTENT);
}
