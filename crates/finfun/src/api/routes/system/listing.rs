use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    api::extractors::BearerAuth,
    domain::{ListingEntry, ListingSelection},
    startup::AppState,
};

#[derive(Debug, Deserialize, Default)]
pub struct ListingQuery {
    pub category: Option<String>,
    pub tab: Option<String>,
}

/// Current derived listing as JSON, filtered the same way as the listing page.
/// Requires a session like the page itself.
pub async fn get_listing(
    State(state): State<Arc<AppState>>,
    _auth: BearerAuth,
    Query(query): Query<ListingQuery>,
) -> Json<Vec<ListingEntry>> {
    let selection = ListingSelection::from_query(query.category.as_deref(), query.tab.as_deref());
    let snapshot = state.listing.snapshot();
    let entries = selection
        .apply(&snapshot, state.live_tab_policy)
        .into_iter()
        .map(ListingEntry::from)
        .collect();
    Json(entries)
}
