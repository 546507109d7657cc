use finfun_core::{ActivityTab, Competition};
use maud::{html, Markup};

use crate::templates::components::{circle_tabs, Tab};

fn status_class(tab: ActivityTab) -> &'static str {
    match tab {
        ActivityTab::Completed => "tag is-light",
        _ => "tag is-success is-light",
    }
}

/// Competitions the user has joined
pub fn activities_page(selected: ActivityTab, competitions: &[&Competition]) -> Markup {
    let tabs: Vec<Tab> = ActivityTab::ALL
        .into_iter()
        .map(|tab| Tab {
            label: tab.label(),
            href: format!("/activities?tab={}", tab.slug()),
            active: tab == selected,
        })
        .collect();

    html! {
        div id="activities" class="container" {
            h1 class="title is-4 mb-3" { "My Activities" }
            (circle_tabs(&tabs))

            @if competitions.is_empty() {
                p class="has-text-centered has-text-grey my-6" { "No activities yet." }
            } @else {
                @for competition in competitions {
                    @let href = format!("/competitions/{}", competition.id);
                    @let status = ActivityTab::for_status(&competition.status);
                    a class="box is-block mb-3"
                      href=(href)
                      hx-get=(href)
                      hx-target="#main-content"
                      hx-push-url="true" {
                        div class="level is-mobile" {
                            div class="level-left" {
                                div {
                                    p class="has-text-weight-semibold" { (competition.name) }
                                    p class="is-size-7 has-text-grey" {
                                        (competition.kind) " · " (competition.prize_pool)
                                    }
                                }
                            }
                            div class="level-right" {
                                span class=(status_class(status)) { (status.label()) }
                            }
                        }
                    }
                }
            }
        }
    }
}
