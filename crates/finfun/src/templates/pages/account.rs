use finfun_core::{TokenSymbol, WalletBalance, WithdrawInput, WithdrawRequest};
use maud::{html, Markup};

use crate::templates::components::{error_notice, success_notice};

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

/// Wallet balances and account menu
pub fn account_page(balance: &WalletBalance) -> Markup {
    html! {
        div id="account" class="container" {
            div class="box has-text-centered" {
                p class="heading" { "Wallet value" }
                p class="title is-3" { (format!("${:.2}", balance.sol_value_usd)) }
                div class="level is-mobile mt-4" {
                    div class="level-item has-text-centered" {
                        div {
                            p class="heading" { "SOL" }
                            p class="has-text-weight-semibold" { (balance.sol_balance) }
                        }
                    }
                    div class="level-item has-text-centered" {
                        div {
                            p class="heading" { "USDC" }
                            p class="has-text-weight-semibold" { (balance.usdc_balance) }
                        }
                    }
                }
            }
            nav class="panel" {
                (nav_link("/withdraw", "Withdraw"))
                (nav_link("/settings", "Settings"))
            }
        }
    }
}

/// Withdraw input step
pub fn withdraw_form(input: &WithdrawInput, error: Option<&str>) -> Markup {
    let selected = input
        .token
        .as_deref()
        .and_then(|t| t.parse::<TokenSymbol>().ok())
        .unwrap_or_default();
    html! {
        div id="withdraw" class="container" {
            h1 class="title is-4 mb-3" { "Withdraw" }
            form class="box"
                 hx-post="/withdraw"
                 hx-target="#withdraw"
                 hx-swap="outerHTML" {
                div class="field" {
                    label class="label" { "Token" }
                    div class="control" {
                        div class="select is-fullwidth" {
                            select name="token" {
                                @for token in [TokenSymbol::Sol, TokenSymbol::Usdc] {
                                    option value=(token.as_str()) selected[token == selected] { (token.as_str()) }
                                }
                            }
                        }
                    }
                }
                div class="field" {
                    label class="label" { "Amount" }
                    div class="control" {
                        input class="input" type="text" inputmode="decimal" name="amount"
                              value=(input.amount.as_deref().unwrap_or_default())
                              placeholder="0.00";
                    }
                }
                div class="field" {
                    label class="label" { "Destination address" }
                    div class="control" {
                        input class="input" type="text" name="destination"
                              value=(input.destination.as_deref().unwrap_or_default())
                              placeholder="Wallet address";
                    }
                }
                @if let Some(error) = error {
                    (error_notice(error))
                }
                button class="button is-link is-fullwidth mt-4" type="submit" { "Continue" }
            }
        }
    }
}

/// Confirmation step; carries the validated request in hidden fields
pub fn withdraw_confirm(request: &WithdrawRequest, error: Option<&str>) -> Markup {
    html! {
        div id="withdraw" class="container" {
            h1 class="title is-4 mb-3" { "Confirm Withdraw" }
            form class="box"
                 hx-post="/withdraw/confirm"
                 hx-target="#withdraw"
                 hx-swap="outerHTML" {
                input type="hidden" name="token" value=(request.token.as_str());
                input type="hidden" name="amount" value=(request.amount);
                input type="hidden" name="destination" value=(request.destination);
                table class="table is-fullwidth" {
                    tbody {
                        tr { th { "Amount" } td { (request.amount) " " (request.token) } }
                        tr { th { "To" } td class="is-family-monospace truncate" { (request.destination) } }
                    }
                }
                @if let Some(error) = error {
                    (error_notice(error))
                }
                div class="buttons is-right" {
                    a class="button is-light"
                      href="/withdraw"
                      hx-get="/withdraw"
                      hx-target="#main-content" {
                        "Back"
                    }
                    button class="button is-link" type="submit" { "Withdraw" }
                }
            }
        }
    }
}

/// Result after the platform accepted the withdrawal
pub fn withdraw_done(request: &WithdrawRequest) -> Markup {
    html! {
        div id="withdraw" class="container" {
            (success_notice(&format!("Withdrawal of {} {} submitted.", request.amount, request.token)))
            a class="button is-link is-fullwidth mt-4"
              href="/account"
              hx-get="/account"
              hx-target="#main-content"
              hx-push-url="true" {
                "Back to Account"
            }
        }
    }
}
