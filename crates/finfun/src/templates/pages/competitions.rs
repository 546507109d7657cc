use finfun_core::{CategoryTab, DisplayCompetition, LifecycleTab};
use maud::{html, Markup};

use crate::{
    domain::ListingSelection,
    templates::{
        components::{circle_tabs, load_failed, referral_prompt_modal, square_tabs, Tab},
        fragments::competition_cards,
    },
};

/// View data for the listing page
pub struct ListingPage<'a> {
    pub selection: ListingSelection,
    pub items: Vec<&'a DisplayCompetition>,
    pub show_referral_prompt: bool,
    /// Set when the latest refresh from the platform failed
    pub notice: Option<String>,
}

fn category_tabs(selection: ListingSelection) -> Vec<Tab<'static>> {
    CategoryTab::all_tabs()
        .into_iter()
        .map(|category| Tab {
            label: category.label(),
            href: format!(
                "/competitions?{}",
                ListingSelection {
                    category,
                    tab: selection.tab,
                }
                .query_string()
            ),
            active: category == selection.category,
        })
        .collect()
}

fn lifecycle_tabs(selection: ListingSelection) -> Vec<Tab<'static>> {
    LifecycleTab::ALL
        .into_iter()
        .map(|tab| Tab {
            label: tab.label(),
            href: format!(
                "/competitions?{}",
                ListingSelection {
                    category: selection.category,
                    tab,
                }
                .query_string()
            ),
            active: tab == selection.tab,
        })
        .collect()
}

/// Listing page content
pub fn competitions_page(page: &ListingPage) -> Markup {
    html! {
        div id="allCompetitions" class="container" {
            h1 class="title is-4 mb-3" { "Competitions" }

            (square_tabs(&category_tabs(page.selection)))
            (circle_tabs(&lifecycle_tabs(page.selection)))

            @if let Some(notice) = &page.notice {
                (load_failed(notice))
            }

            // Rows are re-derived on the server every tick; poll at the same cadence
            div id="competitionRows"
                hx-get=(format!("/competitions/rows?{}", page.selection.query_string()))
                hx-trigger="every 1s"
                hx-swap="innerHTML" {
                (competition_cards(&page.items))
            }

            @if page.show_referral_prompt {
                (referral_prompt_modal(None))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finfun_core::CompetitionKind;

    #[test]
    fn test_tabs_keep_the_other_selection() {
        let selection = ListingSelection {
            category: CategoryTab::Kind(CompetitionKind::Trading),
            tab: LifecycleTab::Past,
        };
        let page = ListingPage {
            selection,
            items: vec![],
            show_referral_prompt: false,
            notice: None,
        };
        let markup = competitions_page(&page).into_string();

        assert!(markup.contains("/competitions?category=callers&amp;tab=past"));
        assert!(markup.contains("/competitions?category=trading&amp;tab=upcoming"));
        assert!(markup.contains("/competitions/rows?category=trading&amp;tab=past"));
        assert!(markup.contains("No competitions found."));
        assert!(!markup.contains("referralPromptModal"));
    }
}
