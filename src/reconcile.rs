use std::collections::HashSet;

use crate::reference::TrackUri;

/// Tracks from the reference file that are neither saved nor already in the playlist.
///
/// Computes `file - favorites - playlist`. The result is always a subset of
/// `file` and disjoint from the other two sets; calling it again with the
/// result merged into `favorites` or `playlist` yields an empty set.
pub fn reconcile(
    file: &HashSet<TrackUri>,
    favorites: &HashSet<TrackUri>,
    playlist: &HashSet<TrackUri>,
) -> HashSet<TrackUri> {
    file.difference(favorites)
        .filter(|uri| !playlist.contains(*uri))
        .cloned()
        .collect()
}
