//! # Track resolution
//!
//! Turns a [`Reference`] into a Spotify [`TrackUri`].
//!
//! Spotify references resolve locally. Apple Music references need two remote
//! hops: the iTunes lookup for title, artist and ISRC, then a Spotify search.
//! The search is tiered:
//!
//! 1. ISRC search, when the metadata carries one. A hit is final.
//! 2. `track:<title> artist:<artist>` search limited to one result. The first
//!    result is taken without any similarity check.
//!
//! Each reference yields a [`Resolution`]; nothing in here returns an error or
//! stops the batch. Transport failures during search count as "no match".

use std::{collections::HashSet, fmt};

use async_trait::async_trait;

use crate::{
    Res, info,
    reference::{Reference, ReferenceKind, TrackUri},
    success,
    types::TrackMetadata,
    warning,
};

/// Search capability of the target service.
#[async_trait]
pub trait TrackSearch: Send + Sync {
    /// Looks a track up by its ISRC.
    async fn search_by_exact_code(&self, isrc: &str) -> Res<Option<TrackUri>>;

    /// Free text search on title and artist. Results are in service order.
    async fn search_by_title_artist(
        &self,
        title: &str,
        artist: &str,
        limit: u32,
    ) -> Res<Vec<TrackUri>>;
}

/// Read-only metadata lookup against the secondary catalog.
///
/// Implementations swallow their own failures and return `None`.
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    async fn lookup_metadata(&self, catalog_id: &str) -> Option<TrackMetadata>;
}

/// Why a reference produced no track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unresolved {
    Unparseable,
    MetadataUnavailable,
    NoMatch,
}

impl fmt::Display for Unresolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unresolved::Unparseable => write!(f, "unparseable reference"),
            Unresolved::MetadataUnavailable => write!(f, "metadata unavailable"),
            Unresolved::NoMatch => write!(f, "no match"),
        }
    }
}

pub type Resolution = Result<TrackUri, Unresolved>;

/// How a secondary reference was matched. Reported to the user only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Isrc,
    TitleArtist,
}

/// Outcome of resolving a whole reference list.
#[derive(Debug, Default)]
pub struct ResolutionReport {
    pub resolved: HashSet<TrackUri>,
    pub unresolved: Vec<(Reference, Unresolved)>,
    pub detected: usize,
}

impl ResolutionReport {
    /// Splits per-reference outcomes into the resolved set and the failures.
    pub fn collect<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = (Reference, Resolution)>,
    {
        let mut report = Self::default();
        for (reference, outcome) in outcomes {
            report.detected += 1;
            match outcome {
                Ok(uri) => {
                    report.resolved.insert(uri);
                }
                Err(reason) => report.unresolved.push((reference, reason)),
            }
        }
        report
    }
}

pub struct TrackResolver<S, M> {
    search: S,
    metadata: M,
}

impl<S, M> TrackResolver<S, M>
where
    S: TrackSearch,
    M: MetadataLookup,
{
    pub fn new(search: S, metadata: M) -> Self {
        Self { search, metadata }
    }

    /// Resolves a single reference.
    pub async fn resolve(&self, reference: &Reference) -> Resolution {
        match reference.kind() {
            ReferenceKind::Native(id) => Ok(TrackUri::from_id(id)),
            ReferenceKind::Secondary(id) => {
                let Some(metadata) = self.metadata.lookup_metadata(id).await else {
                    return Err(Unresolved::MetadataUnavailable);
                };
                match self.find_match(&metadata).await {
                    Some((uri, tier)) => {
                        match tier {
                            MatchTier::Isrc => success!(
                                "  ISRC match: {} - {}",
                                metadata.title,
                                metadata.artist
                            ),
                            MatchTier::TitleArtist => success!(
                                "  Keyword match: {} - {}",
                                metadata.title,
                                metadata.artist
                            ),
                        }
                        Ok(uri)
                    }
                    None => Err(Unresolved::NoMatch),
                }
            }
            ReferenceKind::Unrecognized => Err(Unresolved::Unparseable),
        }
    }

    /// Resolves every reference, one at a time and in input order.
    ///
    /// Requests are issued sequentially to keep the upstream rate limits
    /// predictable and the console output ordered.
    pub async fn resolve_all(&self, references: &[Reference]) -> ResolutionReport {
        let mut outcomes = Vec::with_capacity(references.len());
        for reference in references {
            info!("Resolving {}", reference);
            let outcome = self.resolve(reference).await;
            if let Err(reason) = &outcome {
                warning!("  Skipped {}: {}", reference, reason);
            }
            outcomes.push((reference.clone(), outcome));
        }
        ResolutionReport::collect(outcomes)
    }

    async fn find_match(&self, metadata: &TrackMetadata) -> Option<(TrackUri, MatchTier)> {
        if let Some(isrc) = metadata.isrc.as_deref().filter(|c| !c.is_empty()) {
            info!("  Searching by ISRC: {}", isrc);
            match self.search.search_by_exact_code(isrc).await {
                Ok(Some(uri)) => return Some((uri, MatchTier::Isrc)),
                Ok(None) => info!("  No ISRC match"),
                Err(e) => warning!("  ISRC search failed: {}", e),
            }
        }

        info!(
            "  Searching by keywords: track:{} artist:{}",
            metadata.title, metadata.artist
        );
        match self
            .search
            .search_by_title_artist(&metadata.title, &metadata.artist, 1)
            .await
        {
            Ok(candidates) => candidates
                .into_iter()
                .next()
                .map(|uri| (uri, MatchTier::TitleArtist)),
            Err(e) => {
                warning!("  Search failed for {}: {}", metadata.title, e);
                None
            }
        }
    }
}
