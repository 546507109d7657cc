use finfun_core::{DisplayCompetition, LifecycleState, TransferIntent};
use maud::{html, Markup};
use std::str::FromStr;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::templates::{
    components::{join_modal, square_tabs, Tab},
    fragments::{leaderboard, leaderboard_rows},
};

/// Sections of the competition detail page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailSection {
    #[default]
    Details,
    Leaderboards,
}

impl DetailSection {
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Details => "details",
            Self::Leaderboards => "leaderboards",
        }
    }
}

impl FromStr for DetailSection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "details" => Ok(Self::Details),
            "leaderboard" | "leaderboards" => Ok(Self::Leaderboards),
            _ => Err(()),
        }
    }
}

/// Timestamp rendered in UTC and converted to local time by the browser
pub fn utc_time(at: OffsetDateTime) -> Markup {
    let iso = at.format(&Rfc3339).unwrap_or_default();
    html! {
        span class="utc-time" data-utc=(iso) { (iso) }
    }
}

fn section_tabs(competition_id: &str, section: DetailSection) -> Vec<Tab<'static>> {
    [
        (DetailSection::Details, "Details"),
        (DetailSection::Leaderboards, "Leaderboards"),
    ]
    .into_iter()
    .map(|(s, label)| Tab {
        label,
        href: format!("/competitions/{}?section={}", competition_id, s.slug()),
        active: s == section,
    })
    .collect()
}

fn details(item: &DisplayCompetition) -> Markup {
    let competition = &item.competition;
    html! {
        div class="box" {
            @if let Some(description) = &competition.description {
                p class="mb-4" { (description) }
            }
            table class="table is-fullwidth is-narrow" {
                tbody {
                    tr { th { "Category" } td { (competition.kind) } }
                    tr { th { "Prize Pool" } td { (competition.prize_pool) } }
                    tr { th { "Entry Fee" } td { (format!("{} SOL", competition.entry_fee())) } }
                    tr { th { "Participants" } td { (competition.participants()) } }
                    tr { th { "Registration Opens" } td { (utc_time(competition.registration_start)) } }
                    tr { th { "Registration Closes" } td { (utc_time(competition.registration_end)) } }
                    tr { th { "Winners Announced" } td { (utc_time(competition.announce_time)) } }
                }
            }
        }
    }
}

/// Section body, swapped on its own when switching tabs
pub fn detail_section(item: &DisplayCompetition, section: DetailSection) -> Markup {
    let competition = &item.competition;
    match section {
        DetailSection::Details => details(item),
        DetailSection::Leaderboards => leaderboard(
            competition.kind,
            &leaderboard_rows(competition.kind, &competition.submissions),
        ),
    }
}

/// Competition detail page content
pub fn competition_detail_page(
    item: &DisplayCompetition,
    section: DetailSection,
    transfer: &TransferIntent,
) -> Markup {
    let competition = &item.competition;
    html! {
        div id="competitionDetail" class="container" {
            a class="button is-small is-white mb-3"
              href="/competitions"
              hx-get="/competitions"
              hx-target="#main-content"
              hx-push-url="true" {
                "← Back"
            }

            div class="media mb-4" {
                @if !competition.organizer_logo.is_empty() {
                    div class="media-left" {
                        figure class="image is-64x64" {
                            img class="is-rounded" src=(competition.organizer_logo) alt=(competition.organizer_name);
                        }
                    }
                }
                div class="media-content" {
                    h1 class="title is-5 mb-1" { (competition.name) }
                    p class="subtitle is-7 has-text-grey" { (competition.organizer_name) }
                    span class="tag is-light mr-2" { (item.state.label()) }
                    span class="countdown is-size-7" { (item.countdown) }
                }
            }

            (square_tabs(&section_tabs(&competition.id, section)))

            (detail_section(item, section))

            @if item.state == LifecycleState::Live {
                button class="button is-link is-fullwidth" type="button" data-open-modal="joinModal" {
                    "Join Competition"
                }
                (join_modal(&competition.id, competition.kind, transfer, None))
            } @else {
                button class="button is-fullwidth" type="button" disabled {
                    (match item.state {
                        LifecycleState::Upcoming => "Registration not open yet",
                        _ => "Registration closed",
                    })
                }
            }
        }
    }
}
