use axum::{extract::State, response::ErrorResponse};
use hyper::StatusCode;
use log::{debug, error};
use std::sync::Arc;

use crate::{domain::Error, startup::AppState};

pub async fn health(State(state): State<Arc<AppState>>) -> Result<StatusCode, ErrorResponse> {
    // Ping the preferences database
    state.preferences.ping().await.map_err(|e| {
        error!("{}", e);
        e
    })?;

    // The listing recompute loop must still be ticking
    if !state.listing.is_running() {
        let err = Error::Thread(String::from(
            "listing scheduler has stopped, we need to restart the service",
        ));
        error!("{}", err);
        return Err(err.into());
    }

    debug!("service, listing scheduler, and db are up");
    Ok(StatusCode::OK)
}
