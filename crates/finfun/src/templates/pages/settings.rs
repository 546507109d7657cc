use finfun_core::{NotificationSettings, UsedReferral};
use maud::{html, Markup};

use crate::templates::{
    components::{error_notice, success_notice},
    pages::{competition_detail::utc_time, quests::referral_share},
};

fn nav_link(href: &str, label: &str) -> Markup {
    html! {
        a class="panel-block"
          href=(href)
          hx-get=(href)
          hx-target="#main-content"
          hx-push-url="true" {
            (label)
        }
    }
}

pub fn settings_page() -> Markup {
    html! {
        div id="settings" class="container" {
            h1 class="title is-4 mb-3" { "Settings" }
            nav class="panel" {
                (nav_link("/settings/referral", "Referral"))
                (nav_link("/settings/notifications", "Notifications"))
            }
        }
    }
}

/// Outcome of the last form submission on a settings page
pub enum FormNotice<'a> {
    Success(&'a str),
    Error(&'a str),
}

fn form_notice(notice: Option<&FormNotice>) -> Markup {
    html! {
        @match notice {
            Some(FormNotice::Success(message)) => { (success_notice(message)) }
            Some(FormNotice::Error(message)) => { (error_notice(message)) }
            None => {}
        }
    }
}

/// View data for the referral settings page
pub struct ReferralSettings<'a> {
    pub code: Option<&'a str>,
    pub share_link: Option<&'a str>,
    pub used: Option<&'a UsedReferral>,
}

pub fn referral_settings_page(page: &ReferralSettings, notice: Option<&FormNotice>) -> Markup {
    html! {
        div id="referralSettings" class="container" {
            h1 class="title is-4 mb-3" { "Referral" }

            (referral_share(page.code, page.share_link))

            div class="box" {
                @match page.used {
                    Some(used) => {
                        p class="heading" { "Referral code used" }
                        p class="title is-5 is-family-monospace" { (used.code) }
                        @if let Some(at) = used.used_at {
                            p class="is-size-7 has-text-grey" { (utc_time(at)) }
                        }
                        (form_notice(notice))
                    }
                    None => {
                        form hx-post="/settings/referral"
                             hx-target="#referralSettings"
                             hx-swap="outerHTML" {
                            div class="field" {
                                label class="label" { "Enter a friend's referral code" }
                                div class="control" {
                                    input class="input" type="text" name="code" placeholder="Referral code" autocomplete="off";
                                }
                            }
                            (form_notice(notice))
                            button class="button is-link is-fullwidth" type="submit" { "Submit" }
                        }
                    }
                }
            }
        }
    }
}

pub fn notification_settings_page(
    settings: NotificationSettings,
    notice: Option<&FormNotice>,
) -> Markup {
    html! {
        div id="notificationSettings" class="container" {
            h1 class="title is-4 mb-3" { "Notifications" }
            form class="box"
                 hx-post="/settings/notifications"
                 hx-target="#notificationSettings"
                 hx-swap="outerHTML"
                 hx-trigger="change" {
                label class="checkbox" {
                    input type="checkbox" name="push_enabled" value="true" checked[settings.push_enabled];
                    " Push notifications"
                }
                (form_notice(notice))
            }
        }
    }
}
