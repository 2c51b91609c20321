//! # Track references
//!
//! Every non-blank line of the reference file is classified into exactly one
//! [`ReferenceKind`] by [`Reference::parse`]. Parsing is total: a line that
//! matches no known shape becomes [`ReferenceKind::Unrecognized`] instead of an
//! error, so later stages can report it alongside lookup failures.
//!
//! Recognised shapes:
//!
//! ```text
//! spotify:track:4uLU6hMCjMI75M1A2tKUQC                          -> Native
//! https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC?si=...  -> Native
//! https://music.apple.com/jp/album/some-album/1440857781?i=1440858070
//!                                                               -> Secondary("1440858070")
//! https://music.apple.com/jp/song/some-song/1440858070          -> Secondary("1440858070")
//! ```

use std::fmt;

use url::Url;

pub const SPOTIFY_HOST: &str = "open.spotify.com";
pub const APPLE_MUSIC_HOST: &str = "music.apple.com";
pub const TRACK_URI_PREFIX: &str = "spotify:track:";

/// Width of every Spotify track id.
pub const SPOTIFY_ID_LEN: usize = 22;

/// Query parameter that selects one track on an Apple Music album page.
const APPLE_MUSIC_TRACK_PARAM: &str = "i";

/// Canonical Spotify identifier of a track, `spotify:track:<id>`.
///
/// This is the only key used for set membership during reconciliation, so two
/// values are equal exactly when they name the same track.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackUri(String);

impl TrackUri {
    /// Builds a URI from a bare 22 character track id.
    pub fn from_id(id: &str) -> Self {
        TrackUri(format!("{}{}", TRACK_URI_PREFIX, id))
    }

    /// Accepts a string that already carries the `spotify:track:` prefix.
    ///
    /// Returns `None` for anything else, including episode or local-file URIs
    /// that show up in playlists.
    pub fn parse(uri: &str) -> Option<Self> {
        match uri.strip_prefix(TRACK_URI_PREFIX) {
            Some(id) if !id.is_empty() => Some(TrackUri(uri.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bare id without the scheme prefix.
    pub fn id(&self) -> &str {
        &self.0[TRACK_URI_PREFIX.len()..]
    }
}

impl fmt::Display for TrackUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Spotify track id.
    Native(String),
    /// Apple Music track id.
    Secondary(String),
    Unrecognized,
}

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    original: String,
    kind: ReferenceKind,
}

impl Reference {
    /// Classifies one line of input.
    ///
    /// The line is trimmed first. Callers are expected to drop blank lines
    /// before parsing; a blank line that slips through is `Unrecognized`.
    pub fn parse(line: &str) -> Self {
        let original = line.trim().to_string();
        let kind = classify(&original);
        Self { original, kind }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn kind(&self) -> &ReferenceKind {
        &self.kind
    }

    /// Catalog specific id; present for every kind except `Unrecognized`.
    pub fn catalog_id(&self) -> Option<&str> {
        match &self.kind {
            ReferenceKind::Native(id) | ReferenceKind::Secondary(id) => Some(id),
            ReferenceKind::Unrecognized => None,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

fn classify(line: &str) -> ReferenceKind {
    if let Some(uri) = TrackUri::parse(line) {
        return ReferenceKind::Native(uri.id().to_string());
    }

    let Ok(url) = Url::parse(line) else {
        return ReferenceKind::Unrecognized;
    };

    match url.host_str() {
        Some(SPOTIFY_HOST) => spotify_track_id(&url)
            .map(ReferenceKind::Native)
            .unwrap_or(ReferenceKind::Unrecognized),
        Some(APPLE_MUSIC_HOST) => apple_music_track_id(&url)
            .map(ReferenceKind::Secondary)
            .unwrap_or(ReferenceKind::Unrecognized),
        _ => ReferenceKind::Unrecognized,
    }
}

fn path_segments(url: &Url) -> Vec<&str> {
    url.path().split('/').filter(|s| !s.is_empty()).collect()
}

/// `/track/<id>` with an id of exactly [`SPOTIFY_ID_LEN`] base62 characters.
fn spotify_track_id(url: &Url) -> Option<String> {
    match path_segments(url).as_slice() {
        ["track", id]
            if id.len() == SPOTIFY_ID_LEN && id.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            Some(id.to_string())
        }
        _ => None,
    }
}

fn apple_music_track_id(url: &Url) -> Option<String> {
    // the `i` parameter names the track, the path only names the album
    if let Some((_, id)) = url
        .query_pairs()
        .find(|(key, value)| key == APPLE_MUSIC_TRACK_PARAM && !value.is_empty())
    {
        return Some(id.into_owned());
    }

    let segments = path_segments(url);
    if segments.len() < 4 {
        return None;
    }

    segments
        .last()
        .filter(|last| last.chars().all(|c| c.is_ascii_digit()))
        .map(|last| last.to_string())
}
