use finfun_core::{CompetitionKind, Submission};
use maud::{html, Markup};

/// Row shown on a competition's leaderboard
#[derive(Debug, Clone)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub name: String,
    pub entry: String,
}

impl LeaderboardRow {
    pub fn from_submission(kind: CompetitionKind, submission: &Submission, rank: usize) -> Self {
        let entry = match kind {
            CompetitionKind::Callers => submission.coin_address.clone(),
            CompetitionKind::Prediction => submission.predicted_price.map(|p| format!("${}", p)),
            CompetitionKind::Trading => submission.trading_address.clone(),
        };
        Self {
            rank,
            name: submission.display_name().to_string(),
            entry: entry.unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Rows in submission order, ranked from 1
pub fn leaderboard_rows(kind: CompetitionKind, submissions: &[Submission]) -> Vec<LeaderboardRow> {
    submissions
        .iter()
        .enumerate()
        .map(|(i, submission)| LeaderboardRow::from_submission(kind, submission, i + 1))
        .collect()
}

fn entry_heading(kind: CompetitionKind) -> &'static str {
    match kind {
        CompetitionKind::Callers => "Token",
        CompetitionKind::Prediction => "Prediction",
        CompetitionKind::Trading => "Wallet",
    }
}

/// Leaderboard content fragment
pub fn leaderboard(kind: CompetitionKind, rows: &[LeaderboardRow]) -> Markup {
    html! {
        div id="competitionLeaderboard" class="box" {
            @if rows.is_empty() {
                p class="has-text-centered has-text-grey" { "No submissions yet." }
            } @else {
                div class="table-container" {
                    table class="table is-fullwidth is-striped is-narrow" {
                        thead {
                            tr {
                                th { "#" }
                                th { "Name" }
                                th { (entry_heading(kind)) }
                            }
                        }
                        tbody {
                            @for row in rows {
                                tr {
                                    td { (row.rank) }
                                    td { (row.name) }
                                    td class="is-family-monospace truncate" { (row.entry) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
