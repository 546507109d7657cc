use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, response::Html, Form};
use finfun_core::{validate_referral_code, NotificationSettings, ReferralSource};
use log::{error, info, warn};
use maud::Markup;
use secrecy::SecretString;
use serde::Deserialize;

use super::{render_fragment, share_link, HtmlBearerAuth};
use crate::{
    domain::Error,
    startup::AppState,
    templates::{
        components::{load_failed, NavItem},
        pages::{
            notification_settings_page, referral_settings_page, settings_page, FormNotice,
            ReferralSettings,
        },
    },
};

pub async fn settings_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Html<String> {
    render_fragment(&headers, &state, "Settings", NavItem::Account, settings_page())
}

async fn referral_view(
    state: &AppState,
    token: &SecretString,
    notice: Option<&FormNotice<'_>>,
) -> Markup {
    let (code, source) = futures::join!(
        state.platform.referral_code(token),
        state.platform.referral_source(token),
    );

    let code = match code {
        Ok(code) => code.referral_code,
        Err(e) => {
            error!("failed to load referral code: {}", e);
            return load_failed(&e.user_message());
        }
    };
    let source = source.unwrap_or_else(|e| {
        warn!("failed to load referral source: {}", e);
        ReferralSource::default()
    });

    let link = code.as_deref().map(|code| share_link(&state.share_base_url, code));
    referral_settings_page(
        &ReferralSettings {
            code: code.as_deref(),
            share_link: link.as_deref(),
            used: source.user_used_referral_code.as_ref(),
        },
        notice,
    )
}

pub async fn referral_settings_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    HtmlBearerAuth(auth): HtmlBearerAuth,
) -> Html<String> {
    let content = referral_view(&state, &auth.token, None).await;
    render_fragment(&headers, &state, "Referral", NavItem::Account, content)
}

#[derive(Debug, Deserialize, Default)]
pub struct ReferralForm {
    pub code: Option<String>,
}

pub async fn submit_referral_handler(
    State(state): State<Arc<AppState>>,
    HtmlBearerAuth(auth): HtmlBearerAuth,
    Form(form): Form<ReferralForm>,
) -> Html<String> {
    let result = match validate_referral_code(form.code.as_deref().unwrap_or_default()) {
        Ok(request) => state
            .platform
            .submit_referral(&auth.token, &request)
            .await
            .map_err(Error::from),
        Err(e) => Err(Error::from(e)),
    };

    let content = match result {
        Ok(()) => {
            info!("referral code submitted from settings");
            let notice = FormNotice::Success("Referral code applied.");
            referral_view(&state, &auth.token, Some(&notice)).await
        }
        Err(e) => {
            warn!("referral code rejected: {}", e);
            let message = e.user_message();
            referral_view(&state, &auth.token, Some(&FormNotice::Error(&message))).await
        }
    };
    Html(content.into_string())
}

pub async fn notification_settings_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    HtmlBearerAuth(auth): HtmlBearerAuth,
) -> Html<String> {
    let content = match state.platform.notification_settings(&auth.token).await {
        Ok(settings) => notification_settings_page(settings, None),
        Err(e) => {
            error!("failed to load notification settings: {}", e);
            load_failed(&e.user_message())
        }
    };
    render_fragment(&headers, &state, "Notifications", NavItem::Account, content)
}

#[derive(Debug, Deserialize, Default)]
pub struct NotificationForm {
    pub push_enabled: Option<String>,
}

/// Checkbox forms omit the field entirely when unchecked
pub async fn update_notification_settings_handler(
    State(state): State<Arc<AppState>>,
    HtmlBearerAuth(auth): HtmlBearerAuth,
    Form(form): Form<NotificationForm>,
) -> Html<String> {
    let requested = NotificationSettings {
        push_enabled: form.push_enabled.is_some(),
    };

    let content = match state
        .platform
        .update_notification_settings(&auth.token, &requested)
        .await
    {
        Ok(saved) => {
            notification_settings_page(saved, Some(&FormNotice::Success("Settings saved.")))
        }
        Err(e) => {
            warn!("failed to update notification settings: {}", e);
            let previous = NotificationSettings {
                push_enabled: !requested.push_enabled,
            };
            let message = e.user_message();
            notification_settings_page(previous, Some(&FormNotice::Error(&message)))
        }
    };
    Html(content.into_string())
}
