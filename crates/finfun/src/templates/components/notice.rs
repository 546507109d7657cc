use maud::{html, Markup};

pub fn error_notice(message: &str) -> Markup {
    html! {
        p class="help is-danger has-text-centered my-2" role="alert" { (message) }
    }
}

pub fn success_notice(message: &str) -> Markup {
    html! {
        p class="help is-success has-text-centered my-2" role="status" { (message) }
    }
}

/// Shown in place of a page whose data could not be loaded
pub fn load_failed(message: &str) -> Markup {
    html! {
        div class="notification is-warning is-light" {
            p { (message) }
        }
    }
}
