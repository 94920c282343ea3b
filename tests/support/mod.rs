//! In-memory doubles for the catalog and the Roku
//!
//! Shared by the resolver, player and server tests. HTTP-level behaviour is
//! covered separately against mockito.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use jellyroku::error::{CatalogError, DeviceError};
use jellyroku::models::{CatalogItem, Episode, ItemKind, ItemPage, MediaKind, Season};
use jellyroku::{Catalog, Launcher};

/// Catalog backed by maps; records every call
#[derive(Default)]
pub struct FakeCatalog {
    items: HashMap<String, CatalogItem>,
    children: HashMap<String, Vec<CatalogItem>>,
    seasons: HashMap<String, Vec<Season>>,
    episodes: HashMap<(String, String), Vec<Episode>>,
    libraries: HashMap<String, ItemPage>,
    reset_failure: Option<u16>,
    pub calls: Mutex<Vec<String>>,
    pub resets: Mutex<Vec<(String, String)>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, id: &str, kind: ItemKind) -> Self {
        self.items
            .insert(id.to_string(), CatalogItem::new(id, format!("Item {}", id), kind));
        self
    }

    /// Item whose server-side id differs from the id it is requested by
    pub fn with_alias(mut self, requested: &str, server_id: &str, kind: ItemKind) -> Self {
        self.items.insert(
            requested.to_string(),
            CatalogItem::new(server_id, "Aliased", kind),
        );
        self
    }

    pub fn with_series(mut self, id: &str, episodes: &[&str]) -> Self {
        self = self.with_item(id, ItemKind::Series);
        self.children.insert(
            id.to_string(),
            episodes
                .iter()
                .map(|e| CatalogItem::new(*e, format!("Episode {}", e), ItemKind::Episode))
                .collect(),
        );
        self
    }

    /// Append a season with its episodes to a series
    pub fn with_season(mut self, series: &str, season: &str, episodes: &[&str]) -> Self {
        self.seasons
            .entry(series.to_string())
            .or_default()
            .push(Season {
                id: season.to_string(),
            });
        self.episodes.insert(
            (series.to_string(), season.to_string()),
            episodes.iter().map(|e| Episode::new(*e)).collect(),
        );
        self
    }

    pub fn with_library(mut self, id: &str, items: Vec<CatalogItem>) -> Self {
        let total = items.len() as u32;
        self.libraries.insert(
            id.to_string(),
            ItemPage {
                items,
                total_record_count: total,
            },
        );
        self
    }

    pub fn failing_reset(mut self, status: u16) -> Self {
        self.reset_failure = Some(status);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn resets(&self) -> Vec<(String, String)> {
        self.resets.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn fetch_item(&self, id: &str) -> Result<CatalogItem, CatalogError> {
        self.record(format!("item:{}", id));
        self.items
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::EmptyResult(id.to_string()))
    }

    async fn fetch_children(
        &self,
        parent_id: &str,
        item_type: &str,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        self.record(format!("children:{}:{}", parent_id, item_type));
        Ok(self.children.get(parent_id).cloned().unwrap_or_default())
    }

    async fn fetch_seasons(&self, series_id: &str) -> Result<Vec<Season>, CatalogError> {
        self.record(format!("seasons:{}", series_id));
        Ok(self.seasons.get(series_id).cloned().unwrap_or_default())
    }

    async fn fetch_episodes(
        &self,
        series_id: &str,
        season_id: &str,
    ) -> Result<Vec<Episode>, CatalogError> {
        self.record(format!("episodes:{}:{}", series_id, season_id));
        Ok(self
            .episodes
            .get(&(series_id.to_string(), season_id.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_library(&self, library_id: &str) -> Result<ItemPage, CatalogError> {
        self.record(format!("library:{}", library_id));
        self.libraries
            .get(library_id)
            .cloned()
            .ok_or(CatalogError::Rejected(404))
    }

    async fn reset_progress(&self, user_id: &str, item_id: &str) -> Result<(), CatalogError> {
        self.record(format!("reset:{}", item_id));
        self.resets
            .lock()
            .unwrap()
            .push((user_id.to_string(), item_id.to_string()));
        match self.reset_failure {
            Some(status) => Err(CatalogError::Rejected(status)),
            None => Ok(()),
        }
    }
}

/// Launcher that records launches and optionally rejects them
#[derive(Default)]
pub struct FakeLauncher {
    failure: Option<u16>,
    pub launches: Mutex<Vec<(String, MediaKind)>>,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(status: u16) -> Self {
        Self {
            failure: Some(status),
            launches: Mutex::new(Vec::new()),
        }
    }

    pub fn launches(&self) -> Vec<(String, MediaKind)> {
        self.launches.lock().unwrap().clone()
    }
}

#[async_trait]
impl Launcher for FakeLauncher {
    async fn launch(&self, content_id: &str, media_kind: MediaKind) -> Result<(), DeviceError> {
        self.launches
            .lock()
            .unwrap()
            .push((content_id.to_string(), media_kind));
        match self.failure {
            Some(status) => Err(DeviceError::Rejected(status)),
            None => Ok(()),
        }
    }
}
