use maud::{html, Markup};

/// Destinations in the bottom navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    Home,
    Activities,
    Quest,
    Account,
}

impl NavItem {
    pub const ALL: [NavItem; 4] = [
        NavItem::Home,
        NavItem::Activities,
        NavItem::Quest,
        NavItem::Account,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            NavItem::Home => "Home",
            NavItem::Activities => "Activities",
            NavItem::Quest => "Quest",
            NavItem::Account => "Account",
        }
    }

    pub fn href(&self) -> &'static str {
        match self {
            NavItem::Home => "/competitions",
            NavItem::Activities => "/activities",
            NavItem::Quest => "/quests",
            NavItem::Account => "/account",
        }
    }
}

/// Bottom navigation bar, fixed to the viewport on mobile
pub fn navbar(active: NavItem) -> Markup {
    html! {
        nav class="navbar is-fixed-bottom is-white bottom-nav" role="navigation" aria-label="main navigation" {
            div class="navbar-brand is-flex-grow-1 is-justify-content-space-around" {
                @for item in NavItem::ALL {
                    a href=(item.href())
                      class=(if item == active { "navbar-item is-active has-text-link" } else { "navbar-item" })
                      hx-get=(item.href())
                      hx-target="#main-content"
                      hx-push-url="true" {
                        span { (item.label()) }
                    }
                }
            }
        }
    }
}
