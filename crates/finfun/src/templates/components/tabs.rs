use maud::{html, Markup};

/// One entry of a tab bar
pub struct Tab<'a> {
    pub label: &'a str,
    pub href: String,
    pub active: bool,
}

/// Boxed tabs, used for the category selector and page sections
pub fn square_tabs(tabs: &[Tab]) -> Markup {
    html! {
        div class="tabs is-toggle is-small is-fullwidth" {
            ul {
                @for tab in tabs {
                    li class=[tab.active.then_some("is-active")] {
                        a href=(tab.href)
                          hx-get=(tab.href)
                          hx-target="#main-content"
                          hx-push-url="true" {
                            (tab.label)
                        }
                    }
                }
            }
        }
    }
}

/// Rounded tabs, used for the lifecycle and activity selectors
pub fn circle_tabs(tabs: &[Tab]) -> Markup {
    html! {
        div class="buttons are-small is-centered mt-4" {
            @for tab in tabs {
                a class=(if tab.active { "button is-rounded is-link" } else { "button is-rounded is-light" })
                  href=(tab.href)
                  hx-get=(tab.href)
                  hx-target="#main-content"
                  hx-push-url="true" {
                    (tab.label)
                }
            }
        }
    }
}
