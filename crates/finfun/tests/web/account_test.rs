use axum::{body::Body, http::Request, http::StatusCode};
use finfun::PlatformError;
use finfun_core::{
    CompetitionKind, HistoryItem, HistoryKind, Quest, QuestList, QuestSummary, TokenSymbol,
    WalletBalance,
};

use crate::helpers::{
    body_string, competition, get, post_form, MockPlatformClient, TestApp, WINDOW_START,
};

#[tokio::test]
async fn test_account_requires_session() {
    let app = TestApp::new(MockPlatformClient::new());

    let request = Request::builder()
        .uri("/account")
        .header("HX-Request", "true")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_string(response).await.contains("Please log in"));
}

#[tokio::test]
async fn test_account_shows_balances() {
    let mut platform = MockPlatformClient::new();
    platform.expect_wallet_balance().returning(|_| {
        Ok(WalletBalance {
            sol_balance: 1.25,
            usdc_balance: 40.0,
            sol_value_usd: 187.5,
        })
    });
    let app = TestApp::new(platform);

    let body = body_string(app.send(get("/account")).await).await;
    assert!(body.contains("$187.50"));
    assert!(body.contains("1.25"));
}

#[tokio::test]
async fn test_withdraw_review_rejects_bad_amount() {
    let mut platform = MockPlatformClient::new();
    platform.expect_withdraw().times(0);
    let app = TestApp::new(platform);

    let body = body_string(
        app.send(post_form("/withdraw", "token=SOL&amount=0&destination=Dest111"))
            .await,
    )
    .await;
    assert!(body.contains(r#"hx-post="/withdraw""#));
    assert!(!body.contains("/withdraw/confirm"));

    let body = body_string(app.send(post_form("/withdraw", "token=SOL&amount=1")).await).await;
    assert!(body.contains("Please fill in all fields"));
}

#[tokio::test]
async fn test_withdraw_two_step_flow() {
    let mut platform = MockPlatformClient::new();
    platform
        .expect_withdraw()
        .withf(|_, request| {
            request.token == TokenSymbol::Usdc
                && request.amount == "12.5"
                && request.destination == "Dest111"
        })
        .times(1)
        .returning(|_, _| Ok(()));
    let app = TestApp::new(platform);

    let body = body_string(
        app.send(post_form("/withdraw", "token=USDC&amount=12.5&destination=Dest111"))
            .await,
    )
    .await;
    assert!(body.contains(r#"hx-post="/withdraw/confirm""#));

    let body = body_string(
        app.send(post_form(
            "/withdraw/confirm",
            "token=USDC&amount=12.5&destination=Dest111",
        ))
        .await,
    )
    .await;
    assert!(body.contains("Withdrawal of 12.5 USDC submitted."));
}

#[tokio::test]
async fn test_activities_tabs_filter_by_status() {
    let mut platform = MockPlatformClient::new();
    platform.expect_my_activities().returning(|_| {
        let live = competition("a1", "Still Running", CompetitionKind::Callers, 0);
        let mut ended = competition("a2", "All Done", CompetitionKind::Trading, -30);
        ended.status = String::from("ended");
        Ok(vec![live, ended])
    });
    let app = TestApp::new(platform);

    let body = body_string(app.send(get("/activities?tab=completed")).await).await;
    assert!(body.contains("All Done"));
    assert!(!body.contains("Still Running"));

    let body = body_string(app.send(get("/activities")).await).await;
    assert!(body.contains("All Done"));
    assert!(body.contains("Still Running"));
}

fn quest(id: &str, title: &str) -> Quest {
    Quest {
        id: id.to_string(),
        title: title.to_string(),
        points: 100,
        url: String::from("https://x.com/finfun"),
        start_date: None,
        end_date: None,
    }
}

#[tokio::test]
async fn test_quests_page_marks_completed_quests() {
    let mut platform = MockPlatformClient::new();
    platform.expect_quests().returning(|_| {
        Ok(QuestList {
            quests: vec![quest("q1", "Follow on X"), quest("q2", "Join Telegram")],
        })
    });
    platform.expect_quest_summary().returning(|_| {
        Ok(QuestSummary {
            user_points: 100,
            history: vec![HistoryItem {
                kind: HistoryKind::Quest,
                quest_id: Some(String::from("q1")),
                title: Some(String::from("Follow on X")),
                description: String::new(),
                points: 100,
                date: WINDOW_START,
            }],
        })
    });
    platform
        .expect_referral_code()
        .returning(|_| Err(PlatformError::Request(String::from("down"))));
    let app = TestApp::new(platform);

    let body = body_string(app.send(get("/quests")).await).await;
    assert!(body.contains("Completed"));
    assert!(!body.contains(r#"hx-post="/quests/q1/complete""#));
    assert!(body.contains(r#"hx-post="/quests/q2/complete""#));
    assert!(body.contains("No referral code yet."));
}

#[tokio::test]
async fn test_complete_quest_swaps_in_completed_state() {
    let mut platform = MockPlatformClient::new();
    platform.expect_quests().returning(|_| {
        Ok(QuestList {
            quests: vec![quest("q2", "Join Telegram")],
        })
    });
    platform
        .expect_complete_quest()
        .withf(|_, request| request.quest_id == "q2")
        .times(1)
        .returning(|_, _| Ok(()));
    let app = TestApp::new(platform);

    let body = body_string(app.send(post_form("/quests/q2/complete", "")).await).await;
    assert!(body.contains("Completed"));
    assert!(body.contains(r#"id="quest-q2""#));
}

#[tokio::test]
async fn test_notification_toggle_is_saved() {
    let mut platform = MockPlatformClient::new();
    platform
        .expect_update_notification_settings()
        .withf(|_, settings| settings.push_enabled)
        .returning(|_, settings| Ok(*settings));
    let app = TestApp::new(platform);

    let body = body_string(
        app.send(post_form("/settings/notifications", "push_enabled=true"))
            .await,
    )
    .await;
    assert!(body.contains("Settings saved."));
    assert!(body.contains("checked"));
}
