//! # CLI Module
//!
//! User-facing commands. Each function loads what it needs from the
//! environment, runs the library code and turns fatal errors into a red
//! message and exit status 1 via [`error!`](crate::error).
//!
//! - [`sync`] - Resolves the reference file and appends new tracks to the playlist.
//! - [`auth`] - Browser based authorization that prints a refresh token.

mod auth;
mod sync;

pub use auth::auth;
pub use sync::sync;
