mod scheduler;

pub use scheduler::*;

use finfun_core::{filter_listing, CategoryTab, DisplayCompetition, LifecycleTab, LiveTabPolicy};
use serde::Serialize;

/// Listing row as exposed on the JSON api
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ListingEntry {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub state: String,
    pub countdown: String,
    pub participants: usize,
    pub fee: f64,
}

impl From<&DisplayCompetition> for ListingEntry {
    fn from(item: &DisplayCompetition) -> Self {
        Self {
            id: item.competition.id.clone(),
            name: item.competition.name.clone(),
            kind: item.competition.kind.to_string(),
            state: item.state.label().to_string(),
            countdown: item.countdown.to_string(),
            participants: item.competition.participants(),
            fee: item.competition.entry_fee(),
        }
    }
}

/// Tabs currently selected on the listing page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingSelection {
    pub category: CategoryTab,
    pub tab: LifecycleTab,
}

impl ListingSelection {
    /// Parses the query values, falling back to the default tab for anything unknown
    pub fn from_query(category: Option<&str>, tab: Option<&str>) -> Self {
        Self {
            category: category.and_then(|c| c.parse().ok()).unwrap_or_default(),
            tab: tab.and_then(|t| t.parse().ok()).unwrap_or_default(),
        }
    }

    pub fn query_string(&self) -> String {
        format!("category={}&tab={}", self.category.slug(), self.tab.slug())
    }

    pub fn apply<'a>(
        &self,
        snapshot: &'a ListingSnapshot,
        policy: LiveTabPolicy,
    ) -> Vec<&'a DisplayCompetition> {
        filter_listing(&snapshot.items, self.category, self.tab, policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finfun_core::CompetitionKind;

    #[test]
    fn test_selection_from_query() {
        let selection = ListingSelection::from_query(Some("trading"), Some("upcoming"));
        assert_eq!(selection.category, CategoryTab::Kind(CompetitionKind::Trading));
        assert_eq!(selection.tab, LifecycleTab::Upcoming);
        assert_eq!(selection.query_string(), "category=trading&tab=upcoming");

        let fallback = ListingSelection::from_query(Some("votes"), None);
        assert_eq!(fallback, ListingSelection::default());
    }
}
