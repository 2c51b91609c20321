use std::collections::HashSet;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::{
    Res,
    errors::SyncError,
    reference::TrackUri,
    sync::Library,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, Paging, PlaylistItem, SavedTrack,
    },
};

use super::SpotifyClient;

/// Page size of `/me/tracks`.
const SAVED_TRACKS_PAGE: u32 = 50;
/// Page size of `/playlists/{id}/tracks`.
const PLAYLIST_ITEMS_PAGE: u32 = 100;
/// Maximum number of URIs accepted by one append request.
pub const ADD_TRACKS_CHUNK: usize = 100;

impl SpotifyClient {
    /// Follows `next` links until the last page and returns all items.
    async fn fetch_all<T: DeserializeOwned>(&self, first_page: String, limit: u32) -> Res<Vec<T>> {
        let mut items = Vec::new();
        let mut page: Paging<T> = self
            .get_json(&first_page, &[("limit", limit.to_string())])
            .await?;

        loop {
            items.append(&mut page.items);
            match page.next.take() {
                // `next` already carries offset and limit
                Some(next) => page = self.get_json(&next, &[]).await?,
                None => break,
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl Library for SpotifyClient {
    async fn list_favorite_track_ids(&self) -> Res<HashSet<TrackUri>> {
        let saved: Vec<SavedTrack> = self
            .fetch_all(self.endpoint("me/tracks"), SAVED_TRACKS_PAGE)
            .await?;

        Ok(saved
            .into_iter()
            .filter_map(|item| TrackUri::parse(&item.track.uri))
            .collect())
    }

    async fn list_playlist_track_ids(&self, playlist_id: &str) -> Res<HashSet<TrackUri>> {
        let url = self.endpoint(&format!("playlists/{}/tracks", playlist_id));
        let items: Vec<PlaylistItem> = self.fetch_all(url, PLAYLIST_ITEMS_PAGE).await?;

        Ok(items
            .into_iter()
            .filter_map(|item| item.track.and_then(|track| track.uri))
            .filter_map(|uri| TrackUri::parse(&uri))
            .collect())
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &HashSet<TrackUri>) -> Res<()> {
        let url = self.endpoint(&format!("playlists/{}/tracks", playlist_id));
        let mut uris: Vec<String> = uris.iter().map(|uri| uri.to_string()).collect();
        uris.sort();

        let mut added = 0;
        for chunk in uris.chunks(ADD_TRACKS_CHUNK) {
            let body = AddTrackToPlaylistRequest {
                uris: chunk.to_vec(),
            };
            let outcome = match self.send(self.http.post(&url).json(&body)).await {
                Ok(response) => response
                    .json::<AddTrackToPlaylistResponse>()
                    .await
                    .map_err(SyncError::from),
                Err(e) => Err(e),
            };
            if let Err(e) = outcome {
                return Err(SyncError::Mutation {
                    added,
                    reason: e.to_string(),
                });
            }
            added += chunk.len();
        }

        Ok(())
    }
}
