//! Item resolution
//!
//! Turns a requested catalog id into exactly one playable item. Movies and
//! episodes resolve to themselves. A series is flattened into every episode
//! it contains and one is drawn uniformly at random from the whole list, so
//! a season with forty episodes is not weighted the same as a season with two.
//!
//! Resolution never writes to the catalog.

use rand::Rng;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::api::{Catalog, EPISODE_FILTER};
use crate::error::{CatalogError, PlayError};
use crate::models::{Episode, ItemKind, PlayableSelection};

/// How a series is expanded into episodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flatten {
    /// One recursive `ParentId` listing filtered to episodes
    Recursive,
    /// List seasons, then the episodes of each season in turn
    BySeason,
}

/// Pick one element uniformly at random
pub fn pick_uniform<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.random_range(0..items.len()))
}

/// What a requested id can play before any random choice is made
enum Candidates {
    Direct(PlayableSelection),
    Episodes {
        series_id: String,
        episodes: Vec<Episode>,
    },
}

impl Candidates {
    fn choose<R: Rng + ?Sized>(self, rng: &mut R) -> Result<PlayableSelection, PlayError> {
        match self {
            Candidates::Direct(selection) => Ok(selection),
            Candidates::Episodes {
                series_id,
                episodes,
            } => {
                let chosen = pick_uniform(&episodes, rng)
                    .ok_or(PlayError::NoPlayableDescendants(series_id))?;
                debug!(pool = episodes.len(), episode = %chosen.id, "picked episode");
                Ok(PlayableSelection::episode(chosen.id.clone()))
            }
        }
    }
}

/// Resolves requested ids to a single playable selection
///
/// Holds no random state. Each call draws from the RNG it is handed, or from
/// the thread-local one after every catalog read has finished.
pub struct ItemResolver {
    catalog: Arc<dyn Catalog>,
}

impl ItemResolver {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    /// The catalog this resolver reads from
    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }

    /// Resolve a requested id to exactly one playable item
    #[instrument(skip(self))]
    pub async fn resolve(&self, requested_id: &str) -> Result<PlayableSelection, PlayError> {
        let candidates = self.candidates(requested_id).await?;
        let selection = candidates.choose(&mut rand::rng())?;
        info!(%selection, "resolved");
        Ok(selection)
    }

    /// Like [`resolve`](Self::resolve), drawing from `rng`
    pub async fn resolve_with<R: Rng + ?Sized>(
        &self,
        requested_id: &str,
        rng: &mut R,
    ) -> Result<PlayableSelection, PlayError> {
        let candidates = self.candidates(requested_id).await?;
        candidates.choose(rng)
    }

    /// Pick a random episode across every season of a series
    #[instrument(skip(self))]
    pub async fn random_episode(&self, series_id: &str) -> Result<PlayableSelection, PlayError> {
        let candidates = self.season_episodes(series_id).await?;
        let selection = candidates.choose(&mut rand::rng())?;
        info!(%selection, "picked random episode");
        Ok(selection)
    }

    /// Like [`random_episode`](Self::random_episode), drawing from `rng`
    pub async fn random_episode_with<R: Rng + ?Sized>(
        &self,
        series_id: &str,
        rng: &mut R,
    ) -> Result<PlayableSelection, PlayError> {
        let candidates = self.season_episodes(series_id).await?;
        candidates.choose(rng)
    }

    /// Every episode of a series, concatenated in server order
    pub async fn all_descendant_episodes(
        &self,
        series_id: &str,
        flatten: Flatten,
    ) -> Result<Vec<Episode>, CatalogError> {
        let episodes: Vec<Episode> = match flatten {
            Flatten::Recursive => self
                .catalog
                .fetch_children(series_id, EPISODE_FILTER)
                .await?
                .into_iter()
                .map(Episode::from)
                .collect(),
            Flatten::BySeason => {
                let seasons = self.catalog.fetch_seasons(series_id).await?;
                let mut episodes = Vec::new();
                for season in &seasons {
                    episodes.extend(self.catalog.fetch_episodes(series_id, &season.id).await?);
                }
                episodes
            }
        };
        debug!(series_id, ?flatten, count = episodes.len(), "flattened series");
        Ok(episodes)
    }

    async fn candidates(&self, requested_id: &str) -> Result<Candidates, PlayError> {
        let item = self.catalog.fetch_item(requested_id).await?;

        match item.kind {
            ItemKind::Movie => Ok(Candidates::Direct(PlayableSelection::movie(item.id))),
            ItemKind::Episode => Ok(Candidates::Direct(PlayableSelection::episode(item.id))),
            ItemKind::Series => Ok(Candidates::Episodes {
                episodes: self
                    .all_descendant_episodes(requested_id, Flatten::Recursive)
                    .await?,
                series_id: requested_id.to_string(),
            }),
            ItemKind::Unknown => Err(PlayError::UnsupportedItemKind {
                id: item.id,
                kind: item.kind.to_string(),
            }),
        }
    }

    async fn season_episodes(&self, series_id: &str) -> Result<Candidates, PlayError> {
        Ok(Candidates::Episodes {
            episodes: self
                .all_descendant_episodes(series_id, Flatten::BySeason)
                .await?,
            series_id: series_id.to_string(),
        })
    }
}

impl std::fmt::Debug for ItemResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemResolver").finish_non_exhaustive()
    }
}
