//! Playlist Sync Library
//!
//! This library keeps a Spotify playlist in step with a plain text list of track
//! links. Links may point at Spotify or at Apple Music; Apple Music links are
//! matched to Spotify tracks through their ISRC or, failing that, a title and
//! artist search. Only tracks that are neither saved in the user's library nor
//! already in the playlist are appended.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the local authorization server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `errors` - Errors that end a run
//! - `itunes` - Apple Music metadata via the iTunes lookup API
//! - `reconcile` - Set difference deciding which tracks are new
//! - `reference` - Parsing of input lines into typed references
//! - `resolver` - Tiered matching of references to Spotify tracks
//! - `server` - Local HTTP server for the authorization helper
//! - `spotify` - Spotify Web API client implementation
//! - `sync` - The end-to-end sync pipeline
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use spsync::{config, cli};
//!
//! #[tokio::main]
//! async fn main() {
//!     config::load_env().ok();
//!     cli::sync(std::path::Path::new("tracks.txt"), false).await;
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod itunes;
pub mod reconcile;
pub mod reference;
pub mod resolver;
pub mod server;
pub mod spotify;
pub mod sync;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may end a run.
///
/// Failures of a single reference are not expressed through this type; see
/// [`resolver::Unresolved`].
pub type Res<T> = std::result::Result<T, errors::SyncError>;

/// Prints a progress line with a blue `o` marker to stdout.
///
/// Accepts the same arguments as `println!`.
///
/// ```
/// info!("Fetching saved tracks...");
/// info!("Found {} new track(s)", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a line with a green `✓` marker to stdout.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line to stderr and exits with status 1.
///
/// Only the command layer uses this; library code returns [`Res`] instead so
/// the pipeline stays testable.
///
/// ```
/// error!("Cannot read {}", path.display());
/// // not reached
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a yellow `!` line to stderr for problems the run recovers from,
/// such as a reference that could not be matched.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
