//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify Web API that spsync needs:
//! token handling, reading the user's saved tracks and a playlist's contents,
//! appending tracks to a playlist, and track search.
//!
//! ## Architecture
//!
//! ```text
//! Sync pipeline (resolver, reconciliation)
//!          ↓
//! SpotifyClient
//!     ├── Authentication (refresh token exchange, authorization helper)
//!     ├── Library (saved tracks, playlist items, append)
//!     └── Search (ISRC, title/artist)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! - [`auth`] - Refresh token exchange and the `spsync auth` browser flow that
//!   produces the refresh token in the first place.
//! - [`library`] - Paged reads of saved tracks and playlist items, and the
//!   chunked playlist append.
//! - [`search`] - The two search tiers used by the track resolver.
//!
//! ## Authentication
//!
//! [`SpotifyClient::connect`] exchanges the configured refresh token for an access
//! token before anything else happens. The token lives behind an async mutex and
//! is exchanged again when it gets within four minutes of expiring, so long runs
//! never send a stale token.
//!
//! ## Error Handling
//!
//! Non-2xx responses are turned into [`SyncError::Api`] carrying the status and
//! response body. No request is retried; callers decide whether a failure is
//! fatal (library reads, appends) or just a failed match (searches).

use std::sync::Arc;

use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::{
    Res,
    config::{self, Config},
    errors::SyncError,
    types::Token,
};

pub mod auth;
pub mod library;
pub mod search;

/// Seconds before expiry at which the access token is renewed.
const TOKEN_EXPIRY_MARGIN: u64 = 240;

struct Session {
    client_id: String,
    client_secret: String,
    token: Token,
}

impl Session {
    fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + TOKEN_EXPIRY_MARGIN >= self.token.obtained_at + self.token.expires_in
    }
}

/// Authenticated Spotify Web API client.
///
/// Cloning is cheap and clones share the same HTTP connection pool and token.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    token_url: String,
    session: Arc<Mutex<Session>>,
}

impl SpotifyClient {
    /// Creates a client and obtains the first access token.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Auth`] when the accounts service rejects the
    /// credentials or refresh token, or [`SyncError::Http`] on transport failure.
    pub async fn connect(config: &Config) -> Res<Self> {
        Self::connect_to(
            config,
            config::spotify_apiurl(),
            config::spotify_apitoken_url(),
        )
        .await
    }

    /// Like [`SpotifyClient::connect`] with explicit endpoints.
    pub async fn connect_to(config: &Config, api_url: String, token_url: String) -> Res<Self> {
        let http = Client::new();
        let token = auth::refresh_token(
            &http,
            &token_url,
            &config.client_id,
            &config.client_secret,
            &config.refresh_token,
        )
        .await?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token_url,
            session: Arc::new(Mutex::new(Session {
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.clone(),
                token,
            })),
        })
    }

    /// Returns a valid access token, renewing it first when needed.
    async fn access_token(&self) -> Res<String> {
        let mut session = self.session.lock().await;
        if session.is_expired() {
            let renewed = auth::refresh_token(
                &self.http,
                &self.token_url,
                &session.client_id,
                &session.client_secret,
                &session.token.refresh_token,
            )
            .await?;
            session.token = renewed;
        }
        Ok(session.token.access_token.clone())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    async fn send(&self, request: RequestBuilder) -> Res<Response> {
        let token = self.access_token().await?;
        let response = request.bearer_auth(token).send().await?;
        ensure_success(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Res<T> {
        let response = self.send(self.http.get(url).query(query)).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Turns a non-2xx response into [`SyncError::Api`].
pub(crate) async fn ensure_success(response: Response) -> Res<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SyncError::Api { status, body })
}
