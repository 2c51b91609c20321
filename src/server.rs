use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{api, config, config::Credentials, types::AuthState, warning};

/// Serves `/login`, `/callback` and `/health` for the authorization helper.
///
/// Bind failures are recorded in the shared state so the waiting side can
/// report them instead of running into the timeout.
pub async fn start_api_server(state: Arc<Mutex<AuthState>>, credentials: Credentials) {
    let app = Router::new()
        .route("/health", get(api::health))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .layer(Extension(Arc::clone(&state)))
        .layer(Extension(credentials));

    let addr = match SocketAddr::from_str(&config::server_addr()) {
        Ok(addr) => addr,
        Err(e) => {
            state.lock().await.failure = Some(format!("invalid server address: {}", e));
            return;
        }
    };

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            state.lock().await.failure = Some(format!("cannot listen on {}: {}", addr, e));
            return;
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        warning!("Authorization server stopped: {}", e);
    }
}
