use maud::{html, Markup, DOCTYPE};

use crate::templates::components::{navbar, NavItem};

pub struct PageConfig<'a> {
    pub title: &'a str,
    pub api_base: &'a str,
    pub deposit_address: &'a str,
    pub active: NavItem,
}

pub fn base(config: &PageConfig, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                base href="/";
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (config.title) }

                link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bulma@1.0.2/css/bulma.min.css";
                link rel="stylesheet" href="/ui/styles.css";

                script src="https://unpkg.com/htmx.org@1.9.10" {}
            }
            body data-api-base=(config.api_base) data-deposit-address=(config.deposit_address) {
                section class="section pt-3 pb-6 mobile-shell" {
                    div id="main-content" {
                        (content)
                    }
                }

                (navbar(config.active))

                // wallet_bridge.js signs entry-fee transfers and shares referral links
                script src="/ui/wallet_bridge.js" {}
            }
        }
    }
}
