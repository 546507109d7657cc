use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Html,
};
use log::{debug, error};
use serde::Deserialize;

use super::{render_fragment, HtmlBearerAuth};
use crate::{
    startup::AppState,
    templates::{components::NavItem, pages::dashboard_page},
};

#[derive(Debug, Deserialize, Default)]
pub struct VerifyQuery {
    #[serde(rename = "ref")]
    pub referral: Option<String>,
}

/// Post-login landing: verifies the session, forwarding the referral code the
/// user arrived with
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    HtmlBearerAuth(auth): HtmlBearerAuth,
    Query(query): Query<VerifyQuery>,
) -> Html<String> {
    let referral = query
        .referral
        .map(|code| code.trim().to_string())
        .filter(|code| !code.is_empty());

    let content = match state.platform.verify(&auth.token, referral.clone()).await {
        Ok(result) => {
            debug!("verified session: {}", result);
            dashboard_page(referral.as_deref(), None)
        }
        Err(e) => {
            error!("failed to verify session: {}", e);
            dashboard_page(None, Some(&e.user_message()))
        }
    };
    render_fragment(&headers, &state, "Finfun", NavItem::Home, content)
}
