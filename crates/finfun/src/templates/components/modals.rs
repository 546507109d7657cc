use finfun_core::{CompetitionKind, TransferIntent, LAMPORTS_PER_SOL};
use maud::{html, Markup};

use super::error_notice;

/// Referral code prompt shown on the listing page.
///
/// Both buttons post to `/referral/prompt`; an empty code counts as a dismissal.
pub fn referral_prompt_modal(error: Option<&str>) -> Markup {
    html! {
        div id="referralPromptModal" class="modal is-active" {
            div class="modal-background" {}
            div class="modal-card" {
                header class="modal-card-head" {
                    p class="modal-card-title" { "Got a referral code?" }
                }
                form hx-post="/referral/prompt"
                     hx-target="#referralPromptModal"
                     hx-swap="outerHTML" {
                    section class="modal-card-body" {
                        p class="mb-3" { "Enter a friend's code to earn bonus points for both of you." }
                        div class="field" {
                            div class="control" {
                                input class="input" type="text" name="code"
                                      placeholder="Referral code" autocomplete="off";
                            }
                        }
                        @if let Some(error) = error {
                            (error_notice(error))
                        }
                    }
                    footer class="modal-card-foot is-justify-content-flex-end" {
                        button class="button is-light" type="submit" name="dismiss" value="true" {
                            "Skip"
                        }
                        button class="button is-link" type="submit" { "Submit" }
                    }
                }
            }
        }
    }
}

fn input_label(kind: CompetitionKind) -> &'static str {
    match kind {
        CompetitionKind::Callers => "Token address",
        CompetitionKind::Prediction => "Predicted price (USD)",
        CompetitionKind::Trading => "Trading wallet address",
    }
}

fn kind_input(kind: CompetitionKind) -> Markup {
    html! {
        @match kind {
            CompetitionKind::Callers => {
                input class="input" type="text" name="coin_address" placeholder="Token address" required;
            }
            CompetitionKind::Prediction => {
                input class="input" type="number" name="predicted_price" step="any" min="0" placeholder="0.00" required;
            }
            CompetitionKind::Trading => {
                input class="input" type="text" name="trading_address" placeholder="Wallet address" required;
            }
        }
    }
}

/// Join confirmation for a competition.
///
/// The wallet bridge signs the transfer described by the `data-transfer-*`
/// attributes and fills `transaction_signature` before htmx posts the form.
pub fn join_modal(
    competition_id: &str,
    kind: CompetitionKind,
    transfer: &TransferIntent,
    error: Option<&str>,
) -> Markup {
    let fee_sol = transfer.lamports as f64 / LAMPORTS_PER_SOL;
    html! {
        div id="joinModal" class="modal" {
            div class="modal-background" data-close-modal="joinModal" {}
            div class="modal-card" {
                header class="modal-card-head" {
                    p class="modal-card-title" { "Join Competition" }
                    button class="delete" type="button" aria-label="close" data-close-modal="joinModal" {}
                }
                form id="joinForm"
                     hx-post=(format!("/competitions/{}/join", competition_id))
                     hx-target="#joinFormFeedback"
                     hx-swap="innerHTML"
                     data-transfer-lamports=(transfer.lamports)
                     data-transfer-destination=(transfer.destination) {
                    section class="modal-card-body" {
                        div class="field" {
                            label class="label" { (input_label(kind)) }
                            div class="control" { (kind_input(kind)) }
                        }
                        input type="hidden" name="transaction_signature" value="";
                        p class="mb-2" {
                            "Entry fee: "
                            strong { (format!("{} SOL", fee_sol)) }
                        }
                        div id="joinFormFeedback" {
                            @if let Some(error) = error {
                                (error_notice(error))
                            }
                        }
                    }
                    footer class="modal-card-foot is-justify-content-flex-end" {
                        button class="button is-light" type="button" data-close-modal="joinModal" { "Cancel" }
                        button class="button is-link" type="submit" { "Confirm & Pay" }
                    }
                }
            }
        }
    }
}
