use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Html,
};
use finfun_core::{filter_activities, ActivityTab};
use log::error;
use serde::Deserialize;

use super::{render_fragment, HtmlBearerAuth};
use crate::{
    startup::AppState,
    templates::{
        components::{load_failed, NavItem},
        pages::activities_page,
    },
};

#[derive(Debug, Deserialize, Default)]
pub struct TabQuery {
    pub tab: Option<String>,
}

pub async fn activities_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    HtmlBearerAuth(auth): HtmlBearerAuth,
    Query(query): Query<TabQuery>,
) -> Html<String> {
    let tab: ActivityTab = query
        .tab
        .as_deref()
        .and_then(|t| t.parse().ok())
        .unwrap_or_default();

    let content = match state.platform.my_activities(&auth.token).await {
        Ok(competitions) => activities_page(tab, &filter_activities(&competitions, tab)),
        Err(e) => {
            error!("failed to load activities: {}", e);
            load_failed(&e.user_message())
        }
    };
    render_fragment(&headers, &state, "Activities", NavItem::Activities, content)
}
