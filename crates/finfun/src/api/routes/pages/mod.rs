mod account;
mod activities;
mod competitions;
mod dashboard;
mod quests;
mod settings;

pub use account::*;
pub use activities::*;
pub use competitions::*;
pub use dashboard::*;
pub use quests::*;
pub use settings::*;

use axum::{
    extract::{FromRequestParts, State},
    http::{request::Parts, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use maud::{html, Markup};
use std::sync::Arc;

use crate::{
    api::extractors::{AuthError, BearerAuth},
    startup::AppState,
    templates::{
        components::NavItem,
        layouts::base::{base, PageConfig},
        pages::not_found_page,
    },
};

/// Helper to render a fragment or wrap it in the base layout for direct navigation.
/// Returns just the fragment for HTMX requests, or a full page for direct URL access.
pub fn render_fragment(
    headers: &HeaderMap,
    state: &AppState,
    title: &str,
    active: NavItem,
    content: Markup,
) -> Html<String> {
    let is_htmx = headers.get("HX-Request").is_some();

    if is_htmx {
        Html(content.into_string())
    } else {
        let config = PageConfig {
            title,
            api_base: &state.remote_url,
            deposit_address: &state.deposit_address,
            active,
        };
        Html(base(&config, content).into_string())
    }
}

fn login_notice(err: &AuthError) -> Markup {
    let message = match err {
        AuthError::NoAuthHeader => "Please log in to access this page.",
        AuthError::InvalidAuthHeader => "Your session has expired. Please log in again.",
    };

    html! {
        div class="container" {
            div class="notification is-warning" {
                p { (message) }
                // wallet_bridge.js opens the login flow and lands on /dashboard
                button class="button is-link mt-3" type="button" data-login { "Log In" }
            }
        }
    }
}

/// Login prompt for pages that are also reached by direct navigation, so the
/// wallet bridge from the base layout is loaded
pub fn login_required(headers: &HeaderMap, state: &AppState, err: &AuthError) -> Response {
    let page = render_fragment(headers, state, "Log In", NavItem::Home, login_notice(err));
    (StatusCode::UNAUTHORIZED, page).into_response()
}

/// HTML error response for HTMX routes
pub struct HtmlAuthError(pub AuthError);

impl IntoResponse for HtmlAuthError {
    fn into_response(self) -> Response {
        let body = login_notice(&self.0);
        (StatusCode::UNAUTHORIZED, Html(body.into_string())).into_response()
    }
}

impl From<AuthError> for HtmlAuthError {
    fn from(err: AuthError) -> Self {
        HtmlAuthError(err)
    }
}

/// Bearer auth extractor that returns HTML errors for HTMX routes
pub struct HtmlBearerAuth(pub BearerAuth);

impl<S> FromRequestParts<S> for HtmlBearerAuth
where
    S: Send + Sync,
{
    type Rejection = HtmlAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        BearerAuth::from_request_parts(parts, state)
            .await
            .map(HtmlBearerAuth)
            .map_err(HtmlAuthError)
    }
}

pub async fn not_found_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let page = render_fragment(&headers, &state, "Not Found", NavItem::Home, not_found_page());
    (StatusCode::NOT_FOUND, page).into_response()
}
