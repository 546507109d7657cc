use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use finfun::{
    app,
    domain::{Clock, InMemoryPreferenceStore, PreferenceStore, RecomputeScheduler},
    AppState, Platform, PlatformError as Error,
};
use finfun_core::{
    CompleteQuest, Competition, CompetitionKind, JoinRequest, LiveTabPolicy,
    NotificationSettings, QuestList, QuestSummary, ReferralCode, ReferralSource,
    SubmitReferral, WalletBalance, WithdrawRequest,
};
use mockall::mock;
use secrecy::SecretString;
use std::{
    sync::{Arc, Once},
    time::Duration as StdDuration,
};
use time::{macros::datetime, Duration, OffsetDateTime};
use tower::ServiceExt;
use uuid::Uuid;

mock! {
    #[derive(Send, Sync)]
    pub PlatformClient { }

    #[async_trait]
    impl Platform for PlatformClient {
        async fn list_competitions(&self, token: &SecretString) -> Result<Vec<Competition>, Error>;
        async fn my_activities(&self, token: &SecretString) -> Result<Vec<Competition>, Error>;
        async fn get_competition(&self, competition_id: &str) -> Result<Competition, Error>;
        async fn join_competition(
            &self,
            token: &SecretString,
            competition_id: &str,
            request: &JoinRequest,
        ) -> Result<(), Error>;
        async fn wallet_balance(&self, token: &SecretString) -> Result<WalletBalance, Error>;
        async fn withdraw(&self, token: &SecretString, request: &WithdrawRequest) -> Result<(), Error>;
        async fn quests(&self, token: &SecretString) -> Result<QuestList, Error>;
        async fn quest_summary(&self, token: &SecretString) -> Result<QuestSummary, Error>;
        async fn complete_quest(&self, token: &SecretString, request: &CompleteQuest) -> Result<(), Error>;
        async fn referral_code(&self, token: &SecretString) -> Result<ReferralCode, Error>;
        async fn referral_source(&self, token: &SecretString) -> Result<ReferralSource, Error>;
        async fn submit_referral(&self, token: &SecretString, request: &SubmitReferral) -> Result<(), Error>;
        async fn notification_settings(&self, token: &SecretString) -> Result<NotificationSettings, Error>;
        async fn update_notification_settings(
            &self,
            token: &SecretString,
            settings: &NotificationSettings,
        ) -> Result<NotificationSettings, Error>;
        async fn verify(&self, token: &SecretString, referral_code: Option<String>) -> Result<serde_json::Value, Error>;
    }
}

/// Registration of every test competition opens here
pub const WINDOW_START: OffsetDateTime = datetime!(2025-03-01 00:00 UTC);

static INIT_LOGGER: Once = Once::new();

pub fn setup_static_logger() {
    INIT_LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

pub struct TestApp {
    pub router: Router,
    pub listing: Arc<RecomputeScheduler>,
    pub preferences: Arc<InMemoryPreferenceStore>,
}

impl TestApp {
    pub fn new(platform: MockPlatformClient) -> Self {
        Self::with_policy(platform, LiveTabPolicy::ShowAll)
    }

    /// App whose clock sits one minute into the registration window
    pub fn with_policy(platform: MockPlatformClient, live_tab_policy: LiveTabPolicy) -> Self {
        setup_static_logger();
        let listing = Arc::new(RecomputeScheduler::new(
            StdDuration::from_secs(1),
            Arc::new(FixedClock(WINDOW_START + Duration::minutes(1))),
        ));
        let preferences = Arc::new(InMemoryPreferenceStore::new());
        let state = AppState {
            ui_dir: String::from("../public_ui"),
            remote_url: String::from("http://127.0.0.1:9990"),
            deposit_address: String::from("Dest111"),
            share_base_url: String::from("https://app.finfun.xyz"),
            live_tab_policy,
            platform: Arc::new(platform),
            listing: listing.clone(),
            preferences: preferences.clone() as Arc<dyn PreferenceStore>,
        };
        Self {
            router: app(state, vec![]),
            listing,
            preferences,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("HX-Request", "true")
        .header("authorization", "Bearer test-token")
        .body(Body::empty())
        .unwrap()
}

pub fn get_from_device(uri: &str, device: Uuid) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("HX-Request", "true")
        .header("authorization", "Bearer test-token")
        .header("cookie", format!("finfun_device={}", device))
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("HX-Request", "true")
        .header("authorization", "Bearer test-token")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

pub fn post_form_from_device(uri: &str, form: &str, device: Uuid) -> Request<Body> {
    let mut request = post_form(uri, form);
    request.headers_mut().insert(
        "cookie",
        format!("finfun_device={}", device).parse().unwrap(),
    );
    request
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Competition whose registration opens at `WINDOW_START + start_offset_mins`
/// and stays open for five minutes; results follow five minutes later.
pub fn competition(
    id: &str,
    name: &str,
    kind: CompetitionKind,
    start_offset_mins: i64,
) -> Competition {
    let start = WINDOW_START + Duration::minutes(start_offset_mins);
    Competition {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        prize_pool: String::from("10 SOL"),
        organizer_name: String::from("Finfun"),
        organizer_logo: String::new(),
        fee: Some(0.05),
        description: None,
        status: String::from("live"),
        submissions: vec![],
        registration_start: start,
        registration_end: start + Duration::minutes(5),
        announce_time: start + Duration::minutes(10),
    }
}
