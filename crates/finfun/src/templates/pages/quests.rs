use finfun_core::{HistoryKind, Quest, QuestSummary};
use maud::{html, Markup};
use std::str::FromStr;

use crate::templates::{
    components::{error_notice, square_tabs, Tab},
    pages::competition_detail::utc_time,
};

/// Sections of the quest page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestTab {
    #[default]
    Quests,
    History,
}

impl QuestTab {
    pub const ALL: [QuestTab; 2] = [QuestTab::Quests, QuestTab::History];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Quests => "Quests",
            Self::History => "Points History",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Quests => "quests",
            Self::History => "history",
        }
    }
}

impl FromStr for QuestTab {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quests" => Ok(Self::Quests),
            "history" => Ok(Self::History),
            _ => Err(()),
        }
    }
}

/// View data for the quest page
pub struct QuestsPage<'a> {
    pub tab: QuestTab,
    pub quests: &'a [Quest],
    pub summary: &'a QuestSummary,
    pub referral_code: Option<&'a str>,
    pub share_link: Option<&'a str>,
}

/// One quest; replaced in place after the complete action
pub fn quest_item(quest: &Quest, completed: bool, error: Option<&str>) -> Markup {
    html! {
        div id=(format!("quest-{}", quest.id)) class="box mb-3" {
            div class="level is-mobile mb-0" {
                div class="level-left" {
                    div {
                        p class="has-text-weight-semibold" { (quest.title) }
                        p class="is-size-7 has-text-grey" { "+" (quest.points) " points" }
                    }
                }
                div class="level-right" {
                    @if completed {
                        span class="tag is-success is-light" { "Completed" }
                    } @else {
                        a class="button is-small is-link"
                          href=(quest.url)
                          target="_blank"
                          rel="noopener"
                          hx-post=(format!("/quests/{}/complete", quest.id))
                          hx-target=(format!("#quest-{}", quest.id))
                          hx-swap="outerHTML" {
                            "Go"
                        }
                    }
                }
            }
            @if let Some(error) = error {
                (error_notice(error))
            }
        }
    }
}

fn history_label(kind: HistoryKind) -> &'static str {
    match kind {
        HistoryKind::Quest => "Quest",
        HistoryKind::Referral => "Referral",
        HistoryKind::ReferralUsed => "Referral used",
        HistoryKind::Other => "Bonus",
    }
}

fn history(summary: &QuestSummary) -> Markup {
    html! {
        @if summary.history.is_empty() {
            p class="has-text-centered has-text-grey my-6" { "No points earned yet." }
        } @else {
            @for item in &summary.history {
                div class="box mb-2" {
                    div class="level is-mobile" {
                        div class="level-left" {
                            div {
                                p class="has-text-weight-semibold" {
                                    (item.title.as_deref().unwrap_or(history_label(item.kind)))
                                }
                                p class="is-size-7 has-text-grey" { (item.description) }
                                p class="is-size-7 has-text-grey" { (utc_time(item.date)) }
                            }
                        }
                        div class="level-right" {
                            span class="has-text-weight-semibold has-text-success" { "+" (item.points) }
                        }
                    }
                }
            }
        }
    }
}

/// Own referral code with a share action
pub fn referral_share(code: Option<&str>, share_link: Option<&str>) -> Markup {
    html! {
        div class="box" {
            p class="heading" { "Your referral code" }
            @match (code, share_link) {
                (Some(code), Some(link)) => {
                    div class="level is-mobile mb-0" {
                        div class="level-left" {
                            p class="title is-5 is-family-monospace" { (code) }
                        }
                        div class="level-right" {
                            button class="button is-small is-link is-light"
                                   type="button"
                                   data-share-link=(link) {
                                "Share"
                            }
                        }
                    }
                }
                _ => {
                    p class="has-text-grey" { "No referral code yet." }
                }
            }
        }
    }
}

/// Quest page content
pub fn quests_page(page: &QuestsPage) -> Markup {
    let tabs: Vec<Tab> = QuestTab::ALL
        .into_iter()
        .map(|tab| Tab {
            label: tab.label(),
            href: format!("/quests?tab={}", tab.slug()),
            active: tab == page.tab,
        })
        .collect();

    html! {
        div id="quests" class="container" {
            div class="box has-text-centered" {
                p class="heading" { "Your points" }
                p class="title is-3" { (page.summary.user_points) }
            }

            (referral_share(page.referral_code, page.share_link))

            (square_tabs(&tabs))

            @match page.tab {
                QuestTab::Quests => {
                    @if page.quests.is_empty() {
                        p class="has-text-centered has-text-grey my-6" { "No quests available." }
                    } @else {
                        @for quest in page.quests {
                            (quest_item(quest, page.summary.is_quest_completed(&quest.id), None))
                        }
                    }
                }
                QuestTab::History => {
                    (history(page.summary))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quest(id: &str) -> Quest {
        Quest {
            id: id.to_string(),
            title: format!("Quest {}", id),
            points: 50,
            url: "https://x.com/finfun".to_string(),
            start_date: None,
            end_date: None,
        }
    }

    #[test]
    fn test_completed_quest_has_no_action() {
        let done = quest_item(&quest("q1"), true, None).into_string();
        assert!(done.contains("Completed"));
        assert!(!done.contains("hx-post"));

        let open = quest_item(&quest("q2"), false, None).into_string();
        assert!(open.contains(r#"hx-post="/quests/q2/complete""#));
    }

    #[test]
    fn test_share_button_only_with_code() {
        let markup = referral_share(
            Some("ABC123"),
            Some("https://app.finfun.xyz/?referral=ABC123"),
        )
        .into_string();
        assert!(markup.contains(r#"data-share-link="https://app.finfun.xyz/?referral=ABC123""#));

        let markup = referral_share(None, None).into_string();
        assert!(markup.contains("No referral code yet."));
    }
}
