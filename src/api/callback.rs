use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, http::StatusCode, response::Html};
use tokio::sync::Mutex;

use crate::{config::Credentials, spotify::auth::exchange_code, types::AuthState, warning};

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<AuthState>>>,
    Extension(credentials): Extension<Credentials>,
) -> (StatusCode, Html<&'static str>) {
    let mut state = shared_state.lock().await;

    if let Some(error) = params.get("error") {
        state.failure = Some(format!("authorization denied: {}", error));
        return (StatusCode::BAD_REQUEST, Html("<h4>Authorization denied.</h4>"));
    }

    if params.get("state") != Some(&state.state) {
        state.failure = Some("state mismatch in authorization callback".to_string());
        return (StatusCode::BAD_REQUEST, Html("<h4>Invalid state.</h4>"));
    }

    let Some(code) = params.get("code") else {
        state.failure = Some("authorization code missing in callback".to_string());
        return (
            StatusCode::BAD_REQUEST,
            Html("<h4>Missing authorization code.</h4>"),
        );
    };

    match exchange_code(code, &credentials).await {
        Ok(token) => {
            state.token = Some(token);
            (
                StatusCode::OK,
                Html("<h2>Authentication successful.</h2><p>Close this browser window.</p>"),
            )
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            state.failure = Some(e.to_string());
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h4>Login failed.</h4>"),
            )
        }
    }
}
