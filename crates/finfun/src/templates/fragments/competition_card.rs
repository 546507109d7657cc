use finfun_core::{DisplayCompetition, LifecycleState};
use maud::{html, Markup};

fn state_class(state: LifecycleState) -> &'static str {
    match state {
        LifecycleState::Live => "tag is-success is-light",
        LifecycleState::Upcoming => "tag is-info is-light",
        LifecycleState::Ended => "tag is-warning is-light",
        LifecycleState::Past => "tag is-light",
    }
}

fn countdown_caption(state: LifecycleState) -> &'static str {
    match state {
        LifecycleState::Upcoming => "Starts in",
        LifecycleState::Live => "Registration ends in",
        LifecycleState::Ended => "Results in",
        LifecycleState::Past => "Finished",
    }
}

/// Single competition card in the listing
pub fn competition_card(item: &DisplayCompetition) -> Markup {
    let competition = &item.competition;
    let href = format!("/competitions/{}", competition.id);
    html! {
        div class="card competition-card mb-3" data-competition-id=(competition.id) {
            a class="card-content is-block"
              href=(href)
              hx-get=(href)
              hx-target="#main-content"
              hx-push-url="true" {
                div class="media mb-2" {
                    @if !competition.organizer_logo.is_empty() {
                        div class="media-left" {
                            figure class="image is-48x48" {
                                img class="is-rounded" src=(competition.organizer_logo) alt=(competition.organizer_name);
                            }
                        }
                    }
                    div class="media-content" {
                        p class="title is-6 mb-1" { (competition.name) }
                        p class="subtitle is-7 has-text-grey" { (competition.organizer_name) }
                    }
                    div class="media-right" {
                        span class=(state_class(item.state)) { (item.state.label()) }
                    }
                }
                div class="level is-mobile is-size-7" {
                    div class="level-item has-text-centered" {
                        div {
                            p class="heading" { "Prize Pool" }
                            p class="has-text-weight-semibold" { (competition.prize_pool) }
                        }
                    }
                    div class="level-item has-text-centered" {
                        div {
                            p class="heading" { "Participants" }
                            p class="has-text-weight-semibold" { (competition.participants()) }
                        }
                    }
                    div class="level-item has-text-centered" {
                        div {
                            p class="heading" { (countdown_caption(item.state)) }
                            p class="has-text-weight-semibold countdown" { (item.countdown) }
                        }
                    }
                }
            }
        }
    }
}

/// Cards for the current selection, or the empty-state message
pub fn competition_cards(items: &[&DisplayCompetition]) -> Markup {
    html! {
        @if items.is_empty() {
            p class="has-text-centered has-text-grey my-6" { "No competitions found." }
        } @else {
            @for item in items {
                (competition_card(item))
            }
        }
    }
}
