#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use spsync::{
    Res,
    errors::SyncError,
    reference::TrackUri,
    resolver::{MetadataLookup, TrackSearch},
    sync::Library,
    types::TrackMetadata,
};

pub const NATIVE_ID: &str = "AAAAAAAAAAAAAAAAAAAAAA";

pub fn uri(id: &str) -> TrackUri {
    TrackUri::from_id(id)
}

pub fn uris(ids: &[&str]) -> HashSet<TrackUri> {
    ids.iter().map(|id| TrackUri::from_id(id)).collect()
}

pub fn metadata(title: &str, artist: &str, isrc: Option<&str>) -> TrackMetadata {
    TrackMetadata {
        title: title.to_string(),
        artist: artist.to_string(),
        isrc: isrc.map(str::to_string),
    }
}

#[derive(Clone, Default)]
pub struct FakeSearch {
    pub by_isrc: HashMap<String, TrackUri>,
    pub by_keywords: HashMap<(String, String), Vec<TrackUri>>,
    pub failing: bool,
    pub isrc_calls: Arc<AtomicUsize>,
    pub keyword_calls: Arc<AtomicUsize>,
}

impl FakeSearch {
    pub fn with_isrc(mut self, isrc: &str, track: TrackUri) -> Self {
        self.by_isrc.insert(isrc.to_string(), track);
        self
    }

    pub fn with_keywords(mut self, title: &str, artist: &str, tracks: Vec<TrackUri>) -> Self {
        self.by_keywords
            .insert((title.to_string(), artist.to_string()), tracks);
        self
    }

    pub fn isrc_calls(&self) -> usize {
        self.isrc_calls.load(Ordering::SeqCst)
    }

    pub fn keyword_calls(&self) -> usize {
        self.keyword_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TrackSearch for FakeSearch {
    async fn search_by_exact_code(&self, isrc: &str) -> Res<Option<TrackUri>> {
        self.isrc_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(SyncError::Auth("search unavailable".to_string()));
        }
        Ok(self.by_isrc.get(isrc).cloned())
    }

    async fn search_by_title_artist(
        &self,
        title: &str,
        artist: &str,
        limit: u32,
    ) -> Res<Vec<TrackUri>> {
        self.keyword_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(SyncError::Auth("search unavailable".to_string()));
        }
        Ok(self
            .by_keywords
            .get(&(title.to_string(), artist.to_string()))
            .map(|tracks| tracks.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }
}

#[derive(Clone, Default)]
pub struct FakeCatalog {
    pub tracks: HashMap<String, TrackMetadata>,
    pub calls: Arc<AtomicUsize>,
}

impl FakeCatalog {
    pub fn with_track(mut self, id: &str, metadata: TrackMetadata) -> Self {
        self.tracks.insert(id.to_string(), metadata);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataLookup for FakeCatalog {
    async fn lookup_metadata(&self, catalog_id: &str) -> Option<TrackMetadata> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tracks.get(catalog_id).cloned()
    }
}

#[derive(Default)]
pub struct FakeLibrary {
    pub favorites: HashSet<TrackUri>,
    pub playlist: HashSet<TrackUri>,
    pub fail_add: bool,
    pub reads: AtomicUsize,
    pub added: Mutex<Vec<(String, HashSet<TrackUri>)>>,
}

impl FakeLibrary {
    pub fn new(favorites: HashSet<TrackUri>, playlist: HashSet<TrackUri>) -> Self {
        Self {
            favorites,
            playlist,
            ..Self::default()
        }
    }

    pub fn add_calls(&self) -> Vec<(String, HashSet<TrackUri>)> {
        self.added.lock().unwrap().clone()
    }
}

#[async_trait]
impl Library for FakeLibrary {
    async fn list_favorite_track_ids(&self) -> Res<HashSet<TrackUri>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.favorites.clone())
    }

    async fn list_playlist_track_ids(&self, _playlist_id: &str) -> Res<HashSet<TrackUri>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.playlist.clone())
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &HashSet<TrackUri>) -> Res<()> {
        if self.fail_add {
            return Err(SyncError::Mutation {
                added: 0,
                reason: "503 Service Unavailable".to_string(),
            });
        }
        self.added
            .lock()
            .unwrap()
            .push((playlist_id.to_string(), uris.clone()));
        Ok(())
    }
}
