use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::Client;
use tokio::sync::Mutex;
use url::Url;

use crate::{
    Res,
    config::{self, Credentials},
    errors::SyncError,
    info,
    server::start_api_server,
    types::{AuthState, Token, TokenResponse},
    utils, warning,
};

/// How long `spsync auth` waits for the browser round trip.
pub const AUTH_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Runs the authorization-code flow and returns the resulting token.
///
/// Starts the local callback server, opens the browser at its `/login`
/// endpoint and waits until the callback handler has exchanged the code. The
/// refresh token in the returned [`Token`] is what goes into `REFRESH_TOKEN`.
///
/// # Errors
///
/// - [`SyncError::Auth`] when the user denies access, the `state` value does not
///   match, the code exchange fails, or nothing happens within [`AUTH_TIMEOUT`].
pub async fn auth(credentials: Credentials) -> Res<Token> {
    let shared_state = Arc::new(Mutex::new(AuthState {
        state: utils::generate_state(),
        token: None,
        failure: None,
    }));

    let server_state = Arc::clone(&shared_state);
    let server_credentials = credentials.clone();
    let server = tokio::spawn(async move {
        start_api_server(server_state, server_credentials).await;
    });

    let login_url = format!("http://{}/login", config::server_addr());
    info!("Starting authorization server. Open {} to continue.", login_url);
    if webbrowser::open(&login_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            login_url
        )
    }

    let outcome = wait_for_token(shared_state).await;
    server.abort();
    outcome
}

async fn wait_for_token(shared_state: Arc<Mutex<AuthState>>) -> Res<Token> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < AUTH_TIMEOUT {
        {
            let lock = shared_state.lock().await;
            if let Some(token) = &lock.token {
                return Ok(token.clone());
            }
            if let Some(failure) = &lock.failure {
                return Err(SyncError::Auth(failure.clone()));
            }
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    Err(SyncError::Auth("authorization timed out".to_string()))
}

/// Builds the accounts service URL the `/login` endpoint redirects to.
pub fn authorize_url(client_id: &str, state: &str) -> Res<String> {
    let url = Url::parse_with_params(
        &config::spotify_apiauth_url(),
        &[
            ("client_id", client_id),
            ("response_type", "code"),
            ("redirect_uri", config::spotify_redirect_uri().as_str()),
            ("scope", config::spotify_scope().as_str()),
            ("state", state),
        ],
    )
    .map_err(|e| SyncError::Auth(format!("invalid authorize url: {}", e)))?;
    Ok(url.to_string())
}

/// Exchanges a refresh token for a fresh access token.
///
/// Spotify only sometimes rotates the refresh token; when the response carries
/// none, the one passed in stays valid and is kept.
pub async fn refresh_token(
    http: &Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
) -> Res<Token> {
    let response = http
        .post(token_url)
        .basic_auth(client_id, Some(client_secret))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await?;

    let token = read_token(response).await?;
    Ok(into_token(token, refresh_token))
}

/// Exchanges the authorization code received on `/callback`.
pub async fn exchange_code(code: &str, credentials: &Credentials) -> Res<Token> {
    let response = Client::new()
        .post(config::spotify_apitoken_url())
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config::spotify_redirect_uri().as_str()),
        ])
        .send()
        .await?;

    let token = read_token(response).await?;
    if token.refresh_token.is_none() {
        return Err(SyncError::Auth(
            "token response did not contain a refresh token".to_string(),
        ));
    }
    Ok(into_token(token, ""))
}

async fn read_token(response: reqwest::Response) -> Res<TokenResponse> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SyncError::Auth(format!("{}: {}", status, body)));
    }
    Ok(response.json::<TokenResponse>().await?)
}

fn into_token(response: TokenResponse, previous_refresh_token: &str) -> Token {
    Token {
        access_token: response.access_token,
        refresh_token: response
            .refresh_token
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| previous_refresh_token.to_string()),
        scope: response.scope,
        expires_in: response.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    }
}
