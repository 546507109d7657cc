use finfun::{domain::PreferenceStore, PlatformError};
use uuid::Uuid;

use crate::helpers::{
    body_string, get_from_device, post_form_from_device, MockPlatformClient, TestApp,
};

fn listing_platform() -> MockPlatformClient {
    let mut platform = MockPlatformClient::new();
    platform.expect_list_competitions().returning(|_| Ok(vec![]));
    platform
}

#[tokio::test]
async fn test_prompt_stops_after_three_dismissals() {
    let app = TestApp::new(listing_platform());
    let device = Uuid::now_v7();

    for _ in 0..3 {
        let body = body_string(app.send(get_from_device("/competitions", device)).await).await;
        assert!(body.contains("referralPromptModal"));

        let body = body_string(
            app.send(post_form_from_device("/referral/prompt", "code=&dismiss=true", device))
                .await,
        )
        .await;
        assert!(body.is_empty());
    }

    let body = body_string(app.send(get_from_device("/competitions", device)).await).await;
    assert!(!body.contains("referralPromptModal"));
    assert_eq!(
        app.preferences.get(device).await.unwrap().referral_prompts_shown,
        3
    );
}

#[tokio::test]
async fn test_successful_submit_counts_towards_limit() {
    let mut platform = listing_platform();
    platform
        .expect_submit_referral()
        .withf(|_, request| request.code == "FRIEND1")
        .times(1)
        .returning(|_, _| Ok(()));
    let app = TestApp::new(platform);
    let device = Uuid::now_v7();

    let body = body_string(
        app.send(post_form_from_device("/referral/prompt", "code=+FRIEND1+", device))
            .await,
    )
    .await;
    assert!(body.is_empty());
    assert_eq!(
        app.preferences.get(device).await.unwrap().referral_prompts_shown,
        1
    );
}

#[tokio::test]
async fn test_failed_submit_keeps_prompt_open() {
    let mut platform = listing_platform();
    platform
        .expect_submit_referral()
        .returning(|_, _| Err(PlatformError::BadRequest(String::from("Invalid referral code"))));
    let app = TestApp::new(platform);
    let device = Uuid::now_v7();

    let body = body_string(
        app.send(post_form_from_device("/referral/prompt", "code=NOPE", device))
            .await,
    )
    .await;
    assert!(body.contains("referralPromptModal"));
    assert!(body.contains("Invalid referral code"));
    assert_eq!(
        app.preferences.get(device).await.unwrap().referral_prompts_shown,
        0
    );
}
