use crate::{
    api::{
        extractors::assign_device_id,
        routes::{
            account_handler, activities_handler, competition_detail_handler,
            competitions_handler, competitions_rows_fragment, complete_quest_handler,
            dashboard_handler, get_listing, health, join_competition_handler,
            leaderboard_fragment, not_found_handler, notification_settings_handler,
            quests_handler, referral_prompt_handler, referral_settings_handler, settings_handler,
            submit_referral_handler, update_notification_settings_handler,
            withdraw_confirm_handler, withdraw_handler, withdraw_review_handler,
        },
    },
    config::Settings,
    domain::{PreferenceStore, RecomputeScheduler, SqlitePreferenceStore, SystemClock},
    infra::{
        db::{DBConnection, DatabasePoolConfig},
        file_utils::create_folder,
        platform::{Platform, PlatformClient},
    },
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::{connect_info::IntoMakeServiceWithConnectInfo, ConnectInfo, Path, Request, State},
    http::{header, Extensions, HeaderValue, StatusCode},
    middleware::{self, AddExtension, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    serve::Serve,
    Router,
};
use finfun_core::LiveTabPolicy;
use hyper::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use log::{error, info, warn};
use reqwest_middleware::{
    reqwest::{self, Client, Url},
    ClientBuilder, ClientWithMiddleware, Middleware,
};
use std::{net::SocketAddr, str::FromStr};
use std::{sync::Arc, time::Duration};
use tokio::signal::unix::{signal, SignalKind};
use tokio::{net::TcpListener, select};
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tower_http::cors::{AllowOrigin, CorsLayer};

pub struct Application {
    server: Serve<
        TcpListener,
        IntoMakeServiceWithConnectInfo<Router, SocketAddr>,
        AddExtension<Router, ConnectInfo<SocketAddr>>,
    >,
    cancellation_token: CancellationToken,
    background_tasks: TaskTracker,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let address = format!(
            "{}:{}",
            config.api_settings.domain, config.api_settings.port
        );
        let listener = SocketAddr::from_str(&address)?;
        let (app_state, background_tasks, cancellation_token) = build_app(config.clone()).await?;
        let server = build_server(listener, app_state, config.api_settings.origins).await?;
        Ok(Self {
            server,
            cancellation_token,
            background_tasks,
        })
    }

    pub async fn run_until_stopped(self) -> Result<(), anyhow::Error> {
        info!("Starting server...");
        match self.server.with_graceful_shutdown(shutdown_signal()).await {
            Ok(_) => {
                info!("Server shutdown initiated");
                self.cancellation_token.cancel();

                let timeout = tokio::time::sleep(Duration::from_secs(10));
                select! {
                    _ = self.background_tasks.wait() => {
                        info!("Background tasks completed gracefully");
                    }
                    _ = timeout => {
                        warn!("Background tasks timed out during shutdown");
                    }
                }

                info!("Shutdown complete");
                Ok(())
            }
            Err(e) => {
                error!("Server shutdown error: {}", e);
                self.cancellation_token.cancel();

                let _ =
                    tokio::time::timeout(Duration::from_secs(5), self.background_tasks.wait())
                        .await;

                Err(anyhow!("Error during server shutdown: {}", e))
            }
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub ui_dir: String,
    pub remote_url: String,
    pub deposit_address: String,
    pub share_base_url: String,
    pub live_tab_policy: LiveTabPolicy,
    pub platform: Arc<dyn Platform>,
    pub listing: Arc<RecomputeScheduler>,
    pub preferences: Arc<dyn PreferenceStore>,
}

pub async fn build_app(
    config: Settings,
) -> Result<(AppState, TaskTracker, CancellationToken), anyhow::Error> {
    info!(
        "Static UI assets configured at {}",
        config.ui_settings.ui_dir
    );

    let reqwest_client =
        build_reqwest_client(Duration::from_secs(config.platform_settings.request_timeout_secs))?;

    let platform_url = Url::parse(&config.platform_settings.base_url)
        .map_err(|e| anyhow!("Failed to parse platform url: {}", e))?;
    let platform: Arc<dyn Platform> = Arc::new(PlatformClient::new(reqwest_client, &platform_url));
    info!("Platform client configured for {}", platform_url);

    create_folder(&config.db_settings.data_folder.clone());

    let pool_config: DatabasePoolConfig = config.db_settings.clone().into();
    let preferences_db = DBConnection::new(
        &config.db_settings.data_folder,
        "preferences",
        pool_config,
    )
    .await
    .map_err(|e| anyhow!("Error setting up preferences db: {}", e))?;
    let preferences: Arc<dyn PreferenceStore> =
        Arc::new(SqlitePreferenceStore::new(preferences_db));
    info!("Preference store configured");

    let live_tab_policy = LiveTabPolicy::from_strict(config.listing_settings.strict_live_tab);
    info!("Live Now tab policy: {:?}", live_tab_policy);

    let tracker = TaskTracker::new();
    let cancel_token = CancellationToken::new();
    let listing = Arc::new(RecomputeScheduler::new(
        Duration::from_millis(config.listing_settings.tick_interval_ms),
        Arc::new(SystemClock),
    ));
    if !listing.start(&tracker, &cancel_token) {
        return Err(anyhow!("Failed to start listing recompute scheduler"));
    }
    tracker.close();

    let app_state = AppState {
        ui_dir: config.ui_settings.ui_dir,
        remote_url: config.ui_settings.remote_url,
        deposit_address: config.platform_settings.deposit_address,
        share_base_url: config.platform_settings.share_base_url,
        live_tab_policy,
        platform,
        listing,
        preferences,
    };
    Ok((app_state, tracker, cancel_token))
}

pub async fn build_server(
    socket_addr: SocketAddr,
    app_state: AppState,
    origins: Vec<String>,
) -> Result<
    Serve<
        TcpListener,
        IntoMakeServiceWithConnectInfo<Router, SocketAddr>,
        AddExtension<Router, ConnectInfo<SocketAddr>>,
    >,
    anyhow::Error,
> {
    let listener = TcpListener::bind(socket_addr).await?;

    info!("Setting up service");
    let app = app(app_state, origins);
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    );
    info!(
        "Service running @: http://{}:{}",
        socket_addr.ip(),
        socket_addr.port()
    );
    Ok(server)
}

pub fn app(app_state: AppState, origins: Vec<String>) -> Router {
    let origins: Vec<HeaderValue> = origins
        .into_iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE, AUTHORIZATION])
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true);

    // HTMX routes, rendered as fragments or wrapped in the base layout
    let htmx_routes = Router::new()
        .route("/competitions", get(competitions_handler))
        .route("/competitions/rows", get(competitions_rows_fragment))
        .route(
            "/competitions/{competition_id}",
            get(competition_detail_handler),
        )
        .route(
            "/competitions/{competition_id}/leaderboard",
            get(leaderboard_fragment),
        )
        .route(
            "/competitions/{competition_id}/join",
            post(join_competition_handler),
        )
        .route("/referral/prompt", post(referral_prompt_handler))
        .route("/activities", get(activities_handler))
        .route("/quests", get(quests_handler))
        .route("/quests/{quest_id}/complete", post(complete_quest_handler))
        .route("/account", get(account_handler))
        .route(
            "/withdraw",
            get(withdraw_handler).post(withdraw_review_handler),
        )
        .route("/withdraw/confirm", post(withdraw_confirm_handler))
        .route("/settings", get(settings_handler))
        .route(
            "/settings/referral",
            get(referral_settings_handler).post(submit_referral_handler),
        )
        .route(
            "/settings/notifications",
            get(notification_settings_handler).post(update_notification_settings_handler),
        )
        .route("/dashboard", get(dashboard_handler));

    Router::new()
        .route("/", get(competitions_handler))
        .merge(htmx_routes)
        .fallback(not_found_handler)
        .route("/api/v1/health_check", get(health))
        .route("/api/v1/listing", get(get_listing))
        .route("/ui/{*path}", get(serve_static_file))
        .layer(middleware::from_fn(assign_device_id))
        .layer(middleware::from_fn(log_request))
        .with_state(Arc::new(app_state))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}

async fn serve_static_file(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Response {
    // Prevent directory traversal attacks
    if path.contains("..") {
        return (StatusCode::BAD_REQUEST, "Bad request").into_response();
    }

    let file_path = std::path::Path::new(&state.ui_dir).join(&path);

    let content = match tokio::fs::read(&file_path).await {
        Ok(c) => c,
        Err(_) => return (StatusCode::NOT_FOUND, "Not found").into_response(),
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, get_mime_type(&path))
        .body(Body::from(content))
        .unwrap_or_else(|_| (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response())
}

fn get_mime_type(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or("");
    match ext {
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "html" | "htm" => "text/html; charset=utf-8",
        "json" | "map" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Outbound client for the platform API. No retry layer: a retried join or
/// withdraw could be applied twice upstream.
pub fn build_reqwest_client(timeout: Duration) -> Result<ClientWithMiddleware, anyhow::Error> {
    let client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| anyhow!("Failed to build http client: {}", e))?;
    Ok(ClientBuilder::new(client).with(LoggingMiddleware).build())
}

struct LoggingMiddleware;

#[async_trait::async_trait]
impl Middleware for LoggingMiddleware {
    async fn handle(
        &self,
        req: reqwest::Request,
        extensions: &mut Extensions,
        next: reqwest_middleware::Next<'_>,
    ) -> reqwest_middleware::Result<reqwest::Response> {
        let method = req.method().clone();
        let url = req.url().clone();

        info!("Making {} request to: {}", method, url);

        let result = next.run(req, extensions).await;

        match &result {
            Ok(response) => {
                info!("{} {} -> Status: {}", method, url, response.status());
            }
            Err(error) => {
                warn!("{} {} -> Error: {:?}", method, url, error);
            }
        }

        result
    }
}

async fn shutdown_signal() {
    let mut sigint = match signal(SignalKind::interrupt()) {
        Ok(signal) => signal,
        Err(e) => {
            error!("Failed to install SIGINT handler: {}", e);
            return;
        }
    };
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(signal) => signal,
        Err(e) => {
            error!("Failed to install SIGTERM handler: {}", e);
            return;
        }
    };

    select! {
        _ = sigint.recv() => info!("Received SIGINT signal"),
        _ = sigterm.recv() => info!("Received SIGTERM signal"),
    }
}
