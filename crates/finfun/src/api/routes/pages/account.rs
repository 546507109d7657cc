use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, response::Html, Form};
use finfun_core::{WithdrawInput, WithdrawRequest};
use log::{error, info, warn};
use serde::Deserialize;

use super::{render_fragment, HtmlBearerAuth};
use crate::{
    domain::Error,
    startup::AppState,
    templates::{
        components::{load_failed, NavItem},
        pages::{account_page, withdraw_confirm, withdraw_done, withdraw_form},
    },
};

pub async fn account_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    HtmlBearerAuth(auth): HtmlBearerAuth,
) -> Html<String> {
    let content = match state.platform.wallet_balance(&auth.token).await {
        Ok(balance) => account_page(&balance),
        Err(e) => {
            error!("failed to load wallet balance: {}", e);
            load_failed(&e.user_message())
        }
    };
    render_fragment(&headers, &state, "Account", NavItem::Account, content)
}

pub async fn withdraw_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    HtmlBearerAuth(_): HtmlBearerAuth,
) -> Html<String> {
    let content = withdraw_form(&WithdrawInput::default(), None);
    render_fragment(&headers, &state, "Withdraw", NavItem::Account, content)
}

#[derive(Debug, Deserialize, Default)]
pub struct WithdrawForm {
    pub token: Option<String>,
    pub amount: Option<String>,
    pub destination: Option<String>,
}

impl From<WithdrawForm> for WithdrawInput {
    fn from(form: WithdrawForm) -> Self {
        WithdrawInput {
            token: form.token,
            amount: form.amount,
            destination: form.destination,
        }
    }
}

/// First step: validate and show the confirmation
pub async fn withdraw_review_handler(
    HtmlBearerAuth(_): HtmlBearerAuth,
    Form(form): Form<WithdrawForm>,
) -> Html<String> {
    let input = WithdrawInput::from(form);
    match WithdrawRequest::from_input(&input) {
        Ok(request) => Html(withdraw_confirm(&request, None).into_string()),
        Err(e) => {
            let err = Error::from(e);
            Html(withdraw_form(&input, Some(&err.user_message())).into_string())
        }
    }
}

/// Second step: re-validate and submit to the platform
pub async fn withdraw_confirm_handler(
    State(state): State<Arc<AppState>>,
    HtmlBearerAuth(auth): HtmlBearerAuth,
    Form(form): Form<WithdrawForm>,
) -> Html<String> {
    let input = WithdrawInput::from(form);
    let request = match WithdrawRequest::from_input(&input) {
        Ok(request) => request,
        Err(e) => {
            let err = Error::from(e);
            return Html(withdraw_form(&input, Some(&err.user_message())).into_string());
        }
    };

    match state.platform.withdraw(&auth.token, &request).await {
        Ok(()) => {
            info!("withdrawal of {} {} submitted", request.amount, request.token);
            Html(withdraw_done(&request).into_string())
        }
        Err(e) => {
            warn!("withdrawal failed: {}", e);
            Html(withdraw_confirm(&request, Some(&e.user_message())).into_string())
        }
    }
}
