//! # API Module
//!
//! HTTP endpoints of the local authorization server started by `spsync auth`.
//!
//! ## Endpoints
//!
//! - [`login`] - Redirects the browser to the Spotify authorization page with the
//!   client id, redirect URI, scopes and a random `state` value.
//! - [`callback`] - Receives the authorization code, checks `state`, exchanges
//!   the code for tokens and stores the result in the shared [`AuthState`].
//! - [`health`] - Reports that the server is up and waiting.
//!
//! All handlers share the state through an `Extension` layer, together with the
//! client [`Credentials`].
//!
//! [`AuthState`]: crate::types::AuthState
//! [`Credentials`]: crate::config::Credentials

mod callback;
mod health;
mod login;

pub use callback::callback;
pub use health::health;
pub use login::login;
