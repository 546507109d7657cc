use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Html,
};
use finfun_core::CompleteQuest;
use log::{error, info, warn};

use super::{render_fragment, HtmlBearerAuth, TabQuery};
use crate::{
    infra::platform::Error as PlatformError,
    startup::AppState,
    templates::{
        components::{error_notice, load_failed, NavItem},
        pages::{quest_item, quests_page, QuestTab, QuestsPage},
    },
};

/// Link that credits the referrer when a friend signs up through it
pub fn share_link(share_base_url: &str, code: &str) -> String {
    format!("{}/?referral={}", share_base_url.trim_end_matches('/'), code)
}

pub async fn quests_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    HtmlBearerAuth(auth): HtmlBearerAuth,
    Query(query): Query<TabQuery>,
) -> Html<String> {
    let tab: QuestTab = query
        .tab
        .as_deref()
        .and_then(|t| t.parse().ok())
        .unwrap_or_default();

    let (quests, summary, referral) = futures::join!(
        state.platform.quests(&auth.token),
        state.platform.quest_summary(&auth.token),
        state.platform.referral_code(&auth.token),
    );

    let content = match (quests, summary) {
        (Ok(quests), Ok(summary)) => {
            let code = match referral {
                Ok(referral) => referral.referral_code,
                Err(e) => {
                    warn!("failed to load referral code: {}", e);
                    None
                }
            };
            let link = code.as_deref().map(|code| share_link(&state.share_base_url, code));
            quests_page(&QuestsPage {
                tab,
                quests: &quests.quests,
                summary: &summary,
                referral_code: code.as_deref(),
                share_link: link.as_deref(),
            })
        }
        (Err(e), _) | (_, Err(e)) => {
            error!("failed to load quests: {}", e);
            load_failed(&e.user_message())
        }
    };
    render_fragment(&headers, &state, "Quests", NavItem::Quest, content)
}

/// Marks a quest complete and swaps its row for the completed state
pub async fn complete_quest_handler(
    State(state): State<Arc<AppState>>,
    HtmlBearerAuth(auth): HtmlBearerAuth,
    Path(quest_id): Path<String>,
) -> Html<String> {
    let quest = match state.platform.quests(&auth.token).await {
        Ok(list) => list.quests.into_iter().find(|quest| quest.id == quest_id),
        Err(e) => {
            error!("failed to load quests: {}", e);
            return Html(error_notice(&e.user_message()).into_string());
        }
    };
    let Some(quest) = quest else {
        let err = PlatformError::NotFound(format!("Quest {} not found", quest_id));
        warn!("{}", err);
        return Html(error_notice(&err.user_message()).into_string());
    };

    let request = CompleteQuest {
        quest_id: quest.id.clone(),
    };
    match state.platform.complete_quest(&auth.token, &request).await {
        Ok(()) => {
            info!("quest {} completed", quest.id);
            Html(quest_item(&quest, true, None).into_string())
        }
        Err(e) => {
            warn!("failed to complete quest {}: {}", quest.id, e);
            Html(quest_item(&quest, false, Some(&e.user_message())).into_string())
        }
    }
}
