//! Configuration management for spsync.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. The four settings a sync run cannot do without are
//! gathered into [`Config`], which is built once at startup and handed to the
//! pipeline explicitly. Endpoint URLs have sensible defaults and may be overridden
//! through optional variables.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the current working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (endpoint URLs only)

use std::{env, path::PathBuf};

use crate::errors::SyncError;

pub const CLIENT_ID: &str = "CLIENT_ID";
pub const CLIENT_SECRET: &str = "CLIENT_SECRET";
pub const REFRESH_TOKEN: &str = "REFRESH_TOKEN";
pub const PLAYLIST_ID: &str = "PLAYLIST_ID";

/// Settings required for a sync run.
///
/// Built with [`Config::from_env`] in the binary. Tests construct it with
/// [`Config::from_lookup`] so nothing process-wide has to be mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub playlist_id: String,
}

impl Config {
    /// Reads the required settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] naming every missing or empty variable.
    pub fn from_env() -> Result<Self, SyncError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// A variable that is absent or blank counts as missing. All missing names
    /// are reported together, in declaration order.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use spsync::config::Config;
    ///
    /// let vars: HashMap<&str, &str> = HashMap::from([
    ///     ("CLIENT_ID", "id"),
    ///     ("CLIENT_SECRET", "secret"),
    ///     ("REFRESH_TOKEN", "refresh"),
    ///     ("PLAYLIST_ID", "playlist"),
    /// ]);
    /// let config = Config::from_lookup(|name| vars.get(name).map(|v| v.to_string()))?;
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SyncError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut require = |name: &str| -> String {
            match lookup(name).map(|v| v.trim().to_string()) {
                Some(value) if !value.is_empty() => value,
                _ => {
                    missing.push(name.to_string());
                    String::new()
                }
            }
        };

        let client_id = require(CLIENT_ID);
        let client_secret = require(CLIENT_SECRET);
        let refresh_token = require(REFRESH_TOKEN);
        let playlist_id = require(PLAYLIST_ID);

        if !missing.is_empty() {
            return Err(SyncError::Config(missing));
        }

        Ok(Self {
            client_id,
            client_secret,
            refresh_token,
            playlist_id,
        })
    }
}

/// Client credentials needed by the authorization helper.
///
/// Only `CLIENT_ID` and `CLIENT_SECRET` are required there, since the refresh
/// token is what the helper produces.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self, SyncError> {
        let mut missing = Vec::new();
        let client_id = env::var(CLIENT_ID).unwrap_or_default();
        let client_secret = env::var(CLIENT_SECRET).unwrap_or_default();
        if client_id.trim().is_empty() {
            missing.push(CLIENT_ID.to_string());
        }
        if client_secret.trim().is_empty() {
            missing.push(CLIENT_SECRET.to_string());
        }
        if !missing.is_empty() {
            return Err(SyncError::Config(missing));
        }

        Ok(Self {
            client_id: client_id.trim().to_string(),
            client_secret: client_secret.trim().to_string(),
        })
    }
}

/// Loads environment variables from `.env` files.
///
/// Looks in the current working directory first and then in the platform-specific
/// local data directory under `spsync/.env`. Variables that are already set in the
/// process environment are never overwritten, and a missing file is not an error.
///
/// # Directory Structure
///
/// The data directory file lives in:
/// - Linux: `~/.local/share/spsync/.env`
/// - macOS: `~/Library/Application Support/spsync/.env`
/// - Windows: `%LOCALAPPDATA%/spsync/.env`
///
/// # Errors
///
/// Returns an error string if a `.env` file exists but cannot be parsed.
pub fn load_env() -> Result<(), String> {
    let local = PathBuf::from(".env");
    if local.is_file() {
        dotenv::from_path(&local).map_err(|e| e.to_string())?;
    }

    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spsync/.env");
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }

    Ok(())
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Returns the Spotify Web API base URL (`SPOTIFY_API_URL`).
pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", "https://api.spotify.com/v1")
}

/// Returns the Spotify OAuth token exchange URL (`SPOTIFY_API_TOKEN_URL`).
///
/// Used both for turning the stored refresh token into an access token and for
/// the authorization-code exchange in `spsync auth`.
pub fn spotify_apitoken_url() -> String {
    var_or(
        "SPOTIFY_API_TOKEN_URL",
        "https://accounts.spotify.com/api/token",
    )
}

/// Returns the Spotify OAuth authorization URL (`SPOTIFY_API_AUTH_URL`).
pub fn spotify_apiauth_url() -> String {
    var_or(
        "SPOTIFY_API_AUTH_URL",
        "https://accounts.spotify.com/authorize",
    )
}

/// Returns the redirect URI registered for the Spotify application.
///
/// Must match one of the redirect URIs configured in the Spotify dashboard.
pub fn spotify_redirect_uri() -> String {
    var_or(
        "SPOTIFY_API_REDIRECT_URI",
        "http://127.0.0.1:8888/callback",
    )
}

/// Scopes requested by `spsync auth`.
pub fn spotify_scope() -> String {
    "user-library-read playlist-modify-public playlist-modify-private".to_string()
}

/// Returns the bind address of the local authorization server (`SERVER_ADDRESS`).
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", "127.0.0.1:8888")
}

/// Returns the iTunes lookup endpoint (`ITUNES_LOOKUP_URL`).
pub fn itunes_lookup_url() -> String {
    var_or("ITUNES_LOOKUP_URL", "https://itunes.apple.com/lookup")
}

/// Returns the storefront used for iTunes lookups (`ITUNES_COUNTRY`).
pub fn itunes_country() -> String {
    var_or("ITUNES_COUNTRY", "JP")
}
