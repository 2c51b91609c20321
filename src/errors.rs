//! Errors that end a run.
//!
//! Anything that goes wrong for a single reference is an
//! [`Unresolved`](crate::resolver::Unresolved) value instead and never shows up here.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("missing required settings: {}", .0.join(", "))]
    Config(Vec<String>),
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("spotify api returned {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("adding tracks to playlist failed after {added} track(s) were added: {reason}")]
    Mutation { added: usize, reason: String },
}
