use maud::{html, Markup};

use crate::templates::components::load_failed;

/// Landing page after login; `error` is set when verification failed
pub fn dashboard_page(referral: Option<&str>, error: Option<&str>) -> Markup {
    html! {
        div id="dashboard" class="container has-text-centered" {
            @match error {
                Some(error) => {
                    (load_failed(error))
                }
                None => {
                    h1 class="title is-4" { "Welcome to Finfun" }
                    @if let Some(code) = referral {
                        p class="mb-4" { "Referral code " strong { (code) } " applied." }
                    }
                }
            }
            a class="button is-link"
              href="/competitions"
              hx-get="/competitions"
              hx-target="#main-content"
              hx-push-url="true" {
                "Browse competitions"
            }
        }
    }
}

pub fn not_found_page() -> Markup {
    html! {
        div class="container has-text-centered my-6" {
            h1 class="title is-4" { "Page not found" }
            a class="button is-light" href="/competitions" { "Go home" }
        }
    }
}
