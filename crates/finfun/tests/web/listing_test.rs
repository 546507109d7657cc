use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use finfun::PlatformError;
use finfun_core::{CompetitionKind, LiveTabPolicy};

use crate::helpers::{body_string, competition, get, MockPlatformClient, TestApp};

fn catalogue() -> Vec<finfun_core::Competition> {
    vec![
        // opened a minute ago
        competition("live-1", "Meme Callers", CompetitionKind::Callers, 0),
        // opens in ten minutes
        competition("up-1", "SOL Price Guess", CompetitionKind::Prediction, 10),
        // results already announced
        competition("past-1", "Volume Kings", CompetitionKind::Trading, -30),
    ]
}

#[tokio::test]
async fn test_live_tab_shows_every_competition_by_default() {
    let mut platform = MockPlatformClient::new();
    platform
        .expect_list_competitions()
        .times(1)
        .returning(|_| Ok(catalogue()));
    let app = TestApp::new(platform);

    let response = app.send(get("/competitions?category=all&tab=live")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;

    assert!(body.contains("Meme Callers"));
    assert!(body.contains("SOL Price Guess"));
    assert!(body.contains("Volume Kings"));
    assert!(body.contains("4m 0s"));
}

#[tokio::test]
async fn test_strict_live_tab_only_shows_open_registration() {
    let mut platform = MockPlatformClient::new();
    platform
        .expect_list_competitions()
        .returning(|_| Ok(catalogue()));
    let app = TestApp::with_policy(platform, LiveTabPolicy::Strict);

    let body = body_string(app.send(get("/competitions?tab=live")).await).await;
    assert!(body.contains("Meme Callers"));
    assert!(!body.contains("SOL Price Guess"));
    assert!(!body.contains("Volume Kings"));

    let body = body_string(app.send(get("/competitions?tab=past")).await).await;
    assert!(body.contains("Volume Kings"));
    assert!(!body.contains("Meme Callers"));
}

#[tokio::test]
async fn test_category_tab_filters_by_kind() {
    let mut platform = MockPlatformClient::new();
    platform
        .expect_list_competitions()
        .returning(|_| Ok(catalogue()));
    let app = TestApp::new(platform);

    let response = app
        .send(get("/competitions?category=prediction&tab=upcoming"))
        .await;
    let body = body_string(response).await;
    assert!(body.contains("SOL Price Guess"));
    assert!(!body.contains("Meme Callers"));

    let response = app
        .send(get("/competitions?category=trading&tab=upcoming"))
        .await;
    let body = body_string(response).await;
    assert!(body.contains("No competitions found."));
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_listing() {
    let mut platform = MockPlatformClient::new();
    let mut calls = 0;
    platform.expect_list_competitions().times(2).returning(move |_| {
        calls += 1;
        if calls == 1 {
            Ok(catalogue())
        } else {
            Err(PlatformError::Request(String::from("Service unavailable")))
        }
    });
    let app = TestApp::new(platform);

    app.send(get("/competitions")).await;
    let response = app.send(get("/competitions")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;

    assert!(body.contains("Service unavailable"));
    assert!(body.contains("Meme Callers"));
}

#[tokio::test]
async fn test_rows_are_served_from_the_snapshot() {
    // no expectations: the rows endpoint must not call the platform
    let app = TestApp::new(MockPlatformClient::new());
    app.listing.replace_source(catalogue());

    let response = app.send(get("/competitions/rows?category=callers&tab=live")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;

    assert!(body.contains("Meme Callers"));
    assert!(!body.contains("<html"));
}

#[tokio::test]
async fn test_listing_without_session_asks_to_log_in() {
    // no expectations: nothing may be fetched without a session
    let app = TestApp::new(MockPlatformClient::new());
    app.listing.replace_source(catalogue());

    let request = Request::builder()
        .uri("/competitions")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get("set-cookie").is_some());

    let body = body_string(response).await;
    assert!(body.contains("<html"));
    assert!(body.contains("data-login"));
    assert!(!body.contains("Meme Callers"));

    let request = Request::builder()
        .uri("/competitions/rows?tab=live")
        .header("HX-Request", "true")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(!body_string(response).await.contains("Meme Callers"));
}

#[tokio::test]
async fn test_listing_api_requires_session() {
    let app = TestApp::new(MockPlatformClient::new());
    app.listing.replace_source(catalogue());

    let request = Request::builder()
        .uri("/api/v1/listing")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_listing_api_returns_derived_entries() {
    let app = TestApp::new(MockPlatformClient::new());
    app.listing.replace_source(catalogue());

    let response = app.send(get("/api/v1/listing?category=callers")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let entries: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();

    assert_eq!(
        entries,
        serde_json::json!([{
            "id": "live-1",
            "name": "Meme Callers",
            "kind": "Callers",
            "state": "● Live Now",
            "countdown": "4m 0s",
            "participants": 0,
            "fee": 0.05
        }])
    );
}

#[tokio::test]
async fn test_detail_page_offers_join_for_live_competition() {
    let mut platform = MockPlatformClient::new();
    platform
        .expect_get_competition()
        .withf(|id| id.to_string() == "live-1")
        .returning(|_| Ok(competition("live-1", "Meme Callers", CompetitionKind::Callers, 0)));
    let app = TestApp::new(platform);

    let body = body_string(app.send(get("/competitions/live-1")).await).await;
    assert!(body.contains("joinModal"));
    assert!(body.contains(r#"data-transfer-lamports="50000000""#));
    assert!(body.contains(r#"data-transfer-destination="Dest111""#));
    assert!(body.contains(r#"name="coin_address""#));
}

#[tokio::test]
async fn test_unknown_competition_is_not_found() {
    let mut platform = MockPlatformClient::new();
    platform
        .expect_get_competition()
        .returning(|_| Err(PlatformError::NotFound(String::from("Competition not found"))));
    let app = TestApp::new(platform);

    let response = app.send(get("/competitions/missing")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_string(response).await.contains("Competition not found"));
}

#[tokio::test]
async fn test_health_check_requires_running_scheduler() {
    let app = TestApp::new(MockPlatformClient::new());

    let response = app.send(get("/api/v1/health_check")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let tracker = tokio_util::task::TaskTracker::new();
    let shutdown = tokio_util::sync::CancellationToken::new();
    assert!(app.listing.start(&tracker, &shutdown));

    let response = app.send(get("/api/v1/health_check")).await;
    assert_eq!(response.status(), StatusCode::OK);

    shutdown.cancel();
}
