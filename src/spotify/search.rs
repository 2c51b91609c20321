use async_trait::async_trait;

use crate::{
    Res,
    reference::TrackUri,
    resolver::TrackSearch,
    types::{SearchResponse, Track},
};

use super::SpotifyClient;

impl SpotifyClient {
    async fn search_tracks(&self, query: String, limit: u32) -> Res<Vec<Track>> {
        let url = self.endpoint("search");
        let response: SearchResponse = self
            .get_json(
                &url,
                &[
                    ("q", query),
                    ("type", "track".to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        Ok(response.tracks.items)
    }
}

fn track_uri(track: &Track) -> Option<TrackUri> {
    TrackUri::parse(&track.uri).or_else(|| track.id.as_deref().map(TrackUri::from_id))
}

#[async_trait]
impl TrackSearch for SpotifyClient {
    async fn search_by_exact_code(&self, isrc: &str) -> Res<Option<TrackUri>> {
        let tracks = self.search_tracks(format!("isrc:{}", isrc), 1).await?;
        Ok(tracks.iter().find_map(track_uri))
    }

    async fn search_by_title_artist(
        &self,
        title: &str,
        artist: &str,
        limit: u32,
    ) -> Res<Vec<TrackUri>> {
        let query = format!("track:{} artist:{}", title, artist);
        let tracks = self.search_tracks(query, limit).await?;
        Ok(tracks.iter().filter_map(track_uri).collect())
    }
}
