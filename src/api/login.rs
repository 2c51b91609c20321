use std::sync::Arc;

use axum::{
    Extension,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tokio::sync::Mutex;

use crate::{config::Credentials, info, spotify::auth::authorize_url, types::AuthState, warning};

pub async fn login(
    Extension(shared_state): Extension<Arc<Mutex<AuthState>>>,
    Extension(credentials): Extension<Credentials>,
) -> Response {
    let state = shared_state.lock().await.state.clone();

    match authorize_url(&credentials.client_id, &state) {
        Ok(url) => {
            info!("Redirecting to the Spotify authorization page...");
            Redirect::to(&url).into_response()
        }
        Err(e) => {
            warning!("{}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Cannot build authorization URL.").into_response()
        }
    }
}
