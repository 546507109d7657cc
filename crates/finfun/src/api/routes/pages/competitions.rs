use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use finfun_core::{
    validate_referral_code, DisplayCompetition, JoinInput, JoinRequest, TransferIntent,
};
use log::{debug, error, info, warn};
use serde::Deserialize;

use super::{login_required, render_fragment, HtmlBearerAuth};
use crate::{
    api::{
        extractors::{AuthError, BearerAuth, DeviceId},
        routes::ListingQuery,
    },
    domain::{Error, ListingSelection},
    infra::platform::Error as PlatformError,
    startup::AppState,
    templates::{
        components::{error_notice, load_failed, referral_prompt_modal, success_notice, NavItem},
        fragments::{competition_cards, leaderboard, leaderboard_rows},
        pages::{competition_detail_page, competitions_page, DetailSection, ListingPage},
    },
};

async fn should_prompt_referral(state: &AppState, device: DeviceId) -> bool {
    match state.preferences.get(device.0).await {
        Ok(preferences) => preferences.should_prompt_referral(),
        Err(e) => {
            error!("failed to read preferences for device {}: {}", device.0, e);
            false
        }
    }
}

/// Listing page. Refreshes the shared catalogue from the platform with the
/// caller's session; on failure the previous listing stays on screen.
pub async fn competitions_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    device: DeviceId,
    auth: Result<BearerAuth, AuthError>,
    Query(query): Query<ListingQuery>,
) -> Response {
    let auth = match auth {
        Ok(auth) => auth,
        Err(e) => {
            debug!("listing requested without session: {}", e);
            return login_required(&headers, &state, &e);
        }
    };
    let selection = ListingSelection::from_query(query.category.as_deref(), query.tab.as_deref());

    let notice = match state.platform.list_competitions(&auth.token).await {
        Ok(competitions) => {
            state.listing.replace_source(competitions);
            None
        }
        Err(e) => {
            error!("failed to refresh competitions: {}", e);
            Some(e.user_message())
        }
    };

    let snapshot = state.listing.snapshot();
    let page = ListingPage {
        selection,
        items: selection.apply(&snapshot, state.live_tab_policy),
        show_referral_prompt: should_prompt_referral(&state, device).await,
        notice,
    };
    render_fragment(
        &headers,
        &state,
        "Competitions",
        NavItem::Home,
        competitions_page(&page),
    )
    .into_response()
}

/// Polled every tick by the listing page; served from the latest snapshot only
pub async fn competitions_rows_fragment(
    State(state): State<Arc<AppState>>,
    HtmlBearerAuth(_): HtmlBearerAuth,
    Query(query): Query<ListingQuery>,
) -> Html<String> {
    let selection = ListingSelection::from_query(query.category.as_deref(), query.tab.as_deref());
    let snapshot = state.listing.snapshot();
    let items = selection.apply(&snapshot, state.live_tab_policy);
    Html(competition_cards(&items).into_string())
}

async fn load_competition(
    state: &AppState,
    competition_id: &str,
) -> Result<DisplayCompetition, Error> {
    let competition = state.platform.get_competition(competition_id).await?;
    Ok(DisplayCompetition::derive(&competition, state.listing.now()))
}

fn load_error_response(headers: &HeaderMap, state: &AppState, err: Error) -> Response {
    let status = match &err {
        Error::NotFound(_) | Error::PlatformFailed(PlatformError::NotFound(_)) => {
            StatusCode::NOT_FOUND
        }
        _ => StatusCode::OK,
    };
    let page = render_fragment(
        headers,
        state,
        "Competition",
        NavItem::Home,
        load_failed(&err.user_message()),
    );
    (status, page).into_response()
}

#[derive(Debug, Deserialize, Default)]
pub struct DetailQuery {
    pub section: Option<String>,
}

pub async fn competition_detail_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(competition_id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> Response {
    let section: DetailSection = query
        .section
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();

    let item = match load_competition(&state, &competition_id).await {
        Ok(item) => item,
        Err(e) => {
            error!("failed to load competition {}: {}", competition_id, e);
            return load_error_response(&headers, &state, e);
        }
    };

    let transfer = TransferIntent::for_entry_fee(item.competition.fee, &state.deposit_address);
    let content = competition_detail_page(&item, section, &transfer);
    render_fragment(&headers, &state, &item.competition.name, NavItem::Home, content)
        .into_response()
}

pub async fn leaderboard_fragment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(competition_id): Path<String>,
) -> Response {
    match state.platform.get_competition(&competition_id).await {
        Ok(competition) => {
            let rows = leaderboard_rows(competition.kind, &competition.submissions);
            render_fragment(
                &headers,
                &state,
                "Leaderboard",
                NavItem::Home,
                leaderboard(competition.kind, &rows),
            )
            .into_response()
        }
        Err(e) => {
            error!("failed to load leaderboard for {}: {}", competition_id, e);
            load_error_response(&headers, &state, e.into())
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct JoinForm {
    pub transaction_signature: Option<String>,
    pub coin_address: Option<String>,
    pub predicted_price: Option<String>,
    pub trading_address: Option<String>,
}

impl From<JoinForm> for JoinInput {
    fn from(form: JoinForm) -> Self {
        JoinInput {
            transaction_signature: form.transaction_signature,
            coin_address: form.coin_address,
            predicted_price: form.predicted_price,
            trading_address: form.trading_address,
        }
    }
}

async fn join(
    state: &AppState,
    auth: &BearerAuth,
    competition_id: &str,
    input: &JoinInput,
) -> Result<(), Error> {
    // The fee is already paid once a signature is present; registration
    // state is left for the platform to judge.
    let competition = state.platform.get_competition(competition_id).await?;
    let request = JoinRequest::from_input(competition.kind, input)?;
    state
        .platform
        .join_competition(&auth.token, competition_id, &request)
        .await?;
    Ok(())
}

/// Join confirmation. Errors render next to the confirm control and leave the
/// modal open; success sends the browser to the activities page.
pub async fn join_competition_handler(
    State(state): State<Arc<AppState>>,
    Path(competition_id): Path<String>,
    auth: Result<BearerAuth, AuthError>,
    Form(form): Form<JoinForm>,
) -> Response {
    let auth = match auth {
        Ok(auth) => auth,
        Err(e) => {
            debug!("join attempt without session: {}", e);
            return Html(error_notice("Please log in to join this competition.").into_string())
                .into_response();
        }
    };

    let input = JoinInput::from(form);
    match join(&state, &auth, &competition_id, &input).await {
        Ok(()) => {
            info!("joined competition {}", competition_id);
            let mut response = Html(success_notice("You're in!").into_string()).into_response();
            response
                .headers_mut()
                .insert("HX-Redirect", HeaderValue::from_static("/activities"));
            response
        }
        Err(e) => {
            warn!("failed to join competition {}: {}", competition_id, e);
            Html(error_notice(&e.user_message()).into_string()).into_response()
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ReferralPromptForm {
    pub code: Option<String>,
    pub dismiss: Option<String>,
}

async fn record_prompt(state: &AppState, device: DeviceId) {
    match state.preferences.record_referral_prompt(device.0).await {
        Ok(preferences) => debug!(
            "device {} has seen the referral prompt {} times",
            device.0, preferences.referral_prompts_shown
        ),
        Err(e) => error!("failed to record referral prompt for {}: {}", device.0, e),
    }
}

/// Submit or dismiss the listing page referral prompt. A successful submit or
/// a dismissal counts towards the device's prompt limit; a failed submit does not.
pub async fn referral_prompt_handler(
    State(state): State<Arc<AppState>>,
    device: DeviceId,
    auth: Result<BearerAuth, AuthError>,
    Form(form): Form<ReferralPromptForm>,
) -> Html<String> {
    let code = form.code.unwrap_or_default();
    if form.dismiss.is_some() || code.trim().is_empty() {
        record_prompt(&state, device).await;
        return Html(String::new());
    }

    let Ok(auth) = auth else {
        let modal = referral_prompt_modal(Some("Please log in to use a referral code."));
        return Html(modal.into_string());
    };

    let result = match validate_referral_code(&code) {
        Ok(request) => state
            .platform
            .submit_referral(&auth.token, &request)
            .await
            .map_err(Error::from),
        Err(e) => Err(Error::from(e)),
    };

    match result {
        Ok(()) => {
            info!("referral code submitted from device {}", device.0);
            record_prompt(&state, device).await;
            Html(String::new())
        }
        Err(e) => {
            warn!("referral code rejected: {}", e);
            Html(referral_prompt_modal(Some(&e.user_message())).into_string())
        }
    }
}
