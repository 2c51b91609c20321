//! Apple Music metadata through the public iTunes lookup API.
//!
//! The lookup needs no credentials. Every failure mode (network, status,
//! payload shape, empty result) ends in `None` and a warning line, never in an
//! error, so one bad link cannot stop a run.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::{
    config,
    resolver::MetadataLookup,
    types::{ItunesLookupResponse, TrackMetadata},
    warning,
};

#[derive(Debug, Clone)]
pub struct ItunesClient {
    client: Client,
    lookup_url: String,
    country: String,
}

impl ItunesClient {
    pub fn new(lookup_url: String, country: String) -> Self {
        Self {
            client: Client::new(),
            lookup_url,
            country,
        }
    }

    /// Client configured from `ITUNES_LOOKUP_URL` and `ITUNES_COUNTRY`.
    pub fn from_env() -> Self {
        Self::new(config::itunes_lookup_url(), config::itunes_country())
    }

    async fn fetch(&self, track_id: &str) -> Result<ItunesLookupResponse, String> {
        let response = self
            .client
            .get(&self.lookup_url)
            .query(&[
                ("id", track_id),
                ("country", self.country.as_str()),
                ("entity", "song"),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if response.status() != StatusCode::OK {
            return Err(format!("iTunes API request failed: {}", response.status()));
        }

        response
            .json::<ItunesLookupResponse>()
            .await
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl MetadataLookup for ItunesClient {
    async fn lookup_metadata(&self, catalog_id: &str) -> Option<TrackMetadata> {
        let lookup = match self.fetch(catalog_id).await {
            Ok(lookup) => lookup,
            Err(e) => {
                warning!(
                    "  Failed to fetch Apple Music metadata for {}: {}",
                    catalog_id,
                    e
                );
                return None;
            }
        };

        let metadata = if lookup.result_count == 0 {
            None
        } else {
            lookup.results.into_iter().next().and_then(|track| {
                match (track.track_name, track.artist_name) {
                    (Some(title), Some(artist))
                        if !title.trim().is_empty() && !artist.trim().is_empty() =>
                    {
                        Some(TrackMetadata {
                            title,
                            artist,
                            isrc: track.isrc.filter(|code| !code.trim().is_empty()),
                        })
                    }
                    _ => None,
                }
            })
        };

        if metadata.is_none() {
            warning!("  No metadata found for track ID: {}", catalog_id);
        }
        metadata
    }
}
