//! # Sync pipeline
//!
//! Wires the stages together:
//!
//! ```text
//! reference file ─▶ Reference::parse ─▶ TrackResolver ─▶ resolved set
//!                                                          │
//!           Library::list_favorite_track_ids ──────────────┤
//!           Library::list_playlist_track_ids ──────────────┤
//!                                                          ▼
//!                                         reconcile ─▶ Library::add_tracks
//! ```
//!
//! Per-reference failures are collected in the [`ResolutionReport`] and only
//! reported. Failing to read the saved tracks, read the playlist or append to it
//! ends the run with an error.

use std::{collections::HashSet, path::Path};

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Res,
    errors::SyncError,
    info,
    reconcile::reconcile,
    reference::{Reference, TrackUri},
    resolver::{MetadataLookup, ResolutionReport, TrackResolver, TrackSearch},
    success,
};

/// The user's library on the target service.
#[async_trait]
pub trait Library: Send + Sync {
    async fn list_favorite_track_ids(&self) -> Res<HashSet<TrackUri>>;

    async fn list_playlist_track_ids(&self, playlist_id: &str) -> Res<HashSet<TrackUri>>;

    /// Appends `uris` to the playlist. Only called with a non-empty set.
    async fn add_tracks(&self, playlist_id: &str, uris: &HashSet<TrackUri>) -> Res<()>;
}

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub playlist_id: String,
    pub dry_run: bool,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Non-blank lines in the reference file.
    pub detected: usize,
    /// Distinct tracks the references resolved to.
    pub resolved: usize,
    pub unresolved: usize,
    /// Resolved tracks missing from both saved tracks and the playlist.
    pub new: usize,
    pub added: usize,
}

/// Reads the reference file and returns its trimmed, non-blank lines.
///
/// # Errors
///
/// Returns [`SyncError::Io`] naming the path when the file cannot be read.
pub async fn read_reference_lines(path: &Path) -> Res<Vec<String>> {
    let content = async_fs::read_to_string(path)
        .await
        .map_err(|source| SyncError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Parses every line into a [`Reference`], skipping blank lines.
pub fn parse_references<I, S>(lines: I) -> Vec<Reference>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter(|line| !line.as_ref().trim().is_empty())
        .map(|line| Reference::parse(line.as_ref()))
        .collect()
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

/// Runs one sync for the given reference lines.
///
/// Returns the [`ResolutionReport`] alongside the summary so the caller can list
/// the references that could not be resolved.
///
/// # Errors
///
/// Any error from the [`Library`] ends the run. Errors from `add_tracks` are
/// passed through unchanged; [`SpotifyClient`](crate::spotify::SpotifyClient)
/// reports them as [`SyncError::Mutation`].
pub async fn run<L, S, M>(
    options: &SyncOptions,
    library: &L,
    resolver: &TrackResolver<S, M>,
    lines: &[String],
) -> Res<(SyncSummary, ResolutionReport)>
where
    L: Library,
    S: TrackSearch,
    M: MetadataLookup,
{
    let references = parse_references(lines);
    let report = resolver.resolve_all(&references).await;

    let mut summary = SyncSummary {
        detected: report.detected,
        resolved: report.resolved.len(),
        unresolved: report.unresolved.len(),
        ..SyncSummary::default()
    };
    info!("Resolved {} track(s) from the reference file", summary.resolved);

    if report.resolved.is_empty() {
        info!("No tracks to add. Nothing to do.");
        return Ok((summary, report));
    }

    let pb = spinner("Fetching saved tracks...");
    let favorites = library.list_favorite_track_ids().await;
    pb.finish_and_clear();
    let favorites = favorites?;
    info!("Fetched {} saved track(s)", favorites.len());

    let pb = spinner("Fetching playlist tracks...");
    let playlist = library.list_playlist_track_ids(&options.playlist_id).await;
    pb.finish_and_clear();
    let playlist = playlist?;
    info!("Fetched {} playlist track(s)", playlist.len());

    let new_tracks = reconcile(&report.resolved, &favorites, &playlist);
    summary.new = new_tracks.len();
    info!("Found {} new track(s)", summary.new);

    if new_tracks.is_empty() {
        info!("No new tracks.");
        return Ok((summary, report));
    }

    if options.dry_run {
        let mut pending: Vec<&TrackUri> = new_tracks.iter().collect();
        pending.sort();
        for uri in pending {
            info!("  would add {}", uri);
        }
        info!("Dry run, playlist left unchanged.");
        return Ok((summary, report));
    }

    info!("Adding new tracks to the playlist...");
    library.add_tracks(&options.playlist_id, &new_tracks).await?;
    summary.added = new_tracks.len();
    success!("Added {} track(s)", summary.added);

    Ok((summary, report))
}
