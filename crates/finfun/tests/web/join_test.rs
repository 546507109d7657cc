use axum::{body::Body, http::Request, http::StatusCode};
use finfun::PlatformError;
use finfun_core::{CompetitionKind, JoinEntry};

use crate::helpers::{body_string, competition, post_form, MockPlatformClient, TestApp};

fn platform_with(kind: CompetitionKind, start_offset_mins: i64) -> MockPlatformClient {
    let mut platform = MockPlatformClient::new();
    platform
        .expect_get_competition()
        .returning(move |id| Ok(competition(id, "Weekly", kind, start_offset_mins)));
    platform
}

#[tokio::test]
async fn test_join_requires_transaction_signature() {
    let mut platform = platform_with(CompetitionKind::Callers, 0);
    platform.expect_join_competition().times(0);
    let app = TestApp::new(platform);

    let response = app
        .send(post_form("/competitions/c1/join", "transaction_signature=&coin_address=GrV1"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("HX-Redirect").is_none());
    assert!(body_string(response).await.contains("Transaction signature is required"));
}

#[tokio::test]
async fn test_join_requires_kind_specific_input() {
    let mut platform = platform_with(CompetitionKind::Prediction, 0);
    platform.expect_join_competition().times(0);
    let app = TestApp::new(platform);

    // a token address does not satisfy a prediction competition
    let response = app
        .send(post_form(
            "/competitions/c1/join",
            "transaction_signature=5sig&coin_address=GrV1",
        ))
        .await;
    let body = body_string(response).await;
    assert!(body.contains("Predicted price is required"));
}

#[tokio::test]
async fn test_successful_join_redirects_to_activities() {
    let mut platform = platform_with(CompetitionKind::Prediction, 0);
    platform
        .expect_join_competition()
        .withf(|_, id, request| {
            id.to_string() == "c1"
                && request.transaction_signature == "5sig"
                && request.entry
                    == JoinEntry::Prediction {
                        predicted_price: 182.5,
                    }
        })
        .times(1)
        .returning(|_, _, _| Ok(()));
    let app = TestApp::new(platform);

    let response = app
        .send(post_form(
            "/competitions/c1/join",
            "transaction_signature=5sig&predicted_price=182.5",
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("HX-Redirect").unwrap(),
        "/activities"
    );
}

#[tokio::test]
async fn test_platform_rejection_is_shown_next_to_confirm() {
    let mut platform = platform_with(CompetitionKind::Trading, 0);
    platform
        .expect_join_competition()
        .returning(|_, _, _| Err(PlatformError::BadRequest(String::from("Already joined"))));
    let app = TestApp::new(platform);

    let response = app
        .send(post_form(
            "/competitions/c1/join",
            "transaction_signature=5sig&trading_address=Wallet1",
        ))
        .await;
    assert!(response.headers().get("HX-Redirect").is_none());
    assert!(body_string(response).await.contains("Already joined"));
}

#[tokio::test]
async fn test_paid_join_is_forwarded_after_registration_closes() {
    // registration closed five minutes ago, the fee transfer already went out
    let mut platform = platform_with(CompetitionKind::Callers, -10);
    platform
        .expect_join_competition()
        .withf(|_, id, request| {
            id.to_string() == "c1"
                && request.transaction_signature == "PAIDSIG"
                && request.entry
                    == JoinEntry::Callers {
                        coin_address: String::from("GrV1"),
                    }
        })
        .times(1)
        .returning(|_, _, _| {
            Err(PlatformError::BadRequest(String::from(
                "Registration for this competition is closed",
            )))
        });
    let app = TestApp::new(platform);

    let response = app
        .send(post_form(
            "/competitions/c1/join",
            "transaction_signature=PAIDSIG&coin_address=GrV1",
        ))
        .await;
    assert!(response.headers().get("HX-Redirect").is_none());
    assert!(body_string(response)
        .await
        .contains("Registration for this competition is closed"));
}

#[tokio::test]
async fn test_join_without_session_asks_to_log_in() {
    let app = TestApp::new(MockPlatformClient::new());

    let request = Request::builder()
        .method("POST")
        .uri("/competitions/c1/join")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("transaction_signature=5sig&coin_address=GrV1"))
        .unwrap();
    let body = body_string(app.send(request).await).await;
    assert!(body.contains("Please log in to join this competition."));
}
