//! Jellyfin catalog client
//!
//! Read access to items, seasons and episodes, plus the one write the
//! player needs: clearing an item's played state so it starts from zero.
//! API docs: https://api.jellyfin.org

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::CatalogError;
use crate::models::{CatalogItem, Episode, ItemPage, ItemsEnvelope, Season};

/// Item type filter used when listing playable descendants
pub const EPISODE_FILTER: &str = "Episode";

/// Catalog operations the resolver and handlers depend on
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Look up exactly one item by id
    async fn fetch_item(&self, id: &str) -> Result<CatalogItem, CatalogError>;

    /// All descendants of `parent_id` of the given item type (recursive)
    async fn fetch_children(
        &self,
        parent_id: &str,
        item_type: &str,
    ) -> Result<Vec<CatalogItem>, CatalogError>;

    /// Seasons of a series
    async fn fetch_seasons(&self, series_id: &str) -> Result<Vec<Season>, CatalogError>;

    /// Episodes of one season of a series
    async fn fetch_episodes(
        &self,
        series_id: &str,
        season_id: &str,
    ) -> Result<Vec<Episode>, CatalogError>;

    /// First page of a library's top-level items
    async fn fetch_library(&self, library_id: &str) -> Result<ItemPage, CatalogError>;

    /// Clear the played state of an item for a user
    async fn reset_progress(&self, user_id: &str, item_id: &str) -> Result<(), CatalogError>;
}

/// Jellyfin HTTP client
#[derive(Debug, Clone)]
pub struct JellyfinClient {
    base_url: String,
    api_key: String,
    user_id: String,
    client: reqwest::Client,
}

impl JellyfinClient {
    /// Create a client from the process configuration
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(config.jellyfin_base(), &config.api_key, &config.user_id)
    }

    /// Create a client with an explicit base URL (for testing)
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            user_id: user_id.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Value of the `X-Emby-Authorization` header
    pub fn auth_header(&self) -> String {
        format!(r#"MediaBrowser Token="{}""#, self.api_key)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header("X-Emby-Authorization", self.auth_header())
    }

    /// Send an authenticated request and decode the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let response = self
            .request(Method::GET, path)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(CatalogError::Unreachable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Rejected(status.as_u16()));
        }

        let body = response.text().await.map_err(CatalogError::Unreachable)?;
        serde_json::from_str(&body).map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Catalog for JellyfinClient {
    #[instrument(skip(self))]
    async fn fetch_item(&self, id: &str) -> Result<CatalogItem, CatalogError> {
        let page: ItemPage = self
            .get_json(
                "/Items",
                &[
                    ("userId", self.user_id.as_str()),
                    ("ids", id),
                    ("SortBy", "SortName"),
                    ("SortOrder", "Ascending"),
                    ("Recursive", "False"),
                    ("StartIndex", "0"),
                    ("Limit", "100"),
                    ("EnableImageTypes", "Primary"),
                ],
            )
            .await?;

        let item = page
            .items
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::EmptyResult(id.to_string()))?;
        debug!(kind = %item.kind, name = %item.name, "fetched item");
        Ok(item)
    }

    #[instrument(skip(self))]
    async fn fetch_children(
        &self,
        parent_id: &str,
        item_type: &str,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        let page: ItemPage = self
            .get_json(
                "/Items",
                &[
                    ("userId", self.user_id.as_str()),
                    ("ParentId", parent_id),
                    ("SortBy", "SortName"),
                    ("SortOrder", "Ascending"),
                    ("IncludeItemTypes", item_type),
                    ("Recursive", "True"),
                    ("StartIndex", "0"),
                    ("EnableImageTypes", "Primary"),
                ],
            )
            .await?;
        debug!(count = page.items.len(), "fetched children");
        Ok(page.items)
    }

    #[instrument(skip(self))]
    async fn fetch_seasons(&self, series_id: &str) -> Result<Vec<Season>, CatalogError> {
        let path = format!("/Shows/{}/Seasons", urlencoding::encode(series_id));
        let envelope: ItemsEnvelope<Season> = self.get_json(&path, &[]).await?;
        Ok(envelope.items)
    }

    #[instrument(skip(self))]
    async fn fetch_episodes(
        &self,
        series_id: &str,
        season_id: &str,
    ) -> Result<Vec<Episode>, CatalogError> {
        let path = format!("/Shows/{}/Episodes", urlencoding::encode(series_id));
        let envelope: ItemsEnvelope<Episode> =
            self.get_json(&path, &[("SeasonId", season_id)]).await?;
        Ok(envelope.items)
    }

    #[instrument(skip(self))]
    async fn fetch_library(&self, library_id: &str) -> Result<ItemPage, CatalogError> {
        self.get_json(
            "/Items",
            &[
                ("userId", self.user_id.as_str()),
                ("Fields", "Name,Id,IsSeries"),
                ("SortBy", "SortName"),
                ("SortOrder", "Ascending"),
                ("Recursive", "False"),
                ("StartIndex", "0"),
                ("Limit", "100"),
                ("EnableImageTypes", "Primary"),
                ("ParentId", library_id),
            ],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn reset_progress(&self, user_id: &str, item_id: &str) -> Result<(), CatalogError> {
        let path = format!(
            "/Users/{}/PlayedItems/{}",
            urlencoding::encode(user_id),
            urlencoding::encode(item_id)
        );
        let response = self
            .request(Method::DELETE, &path)
            .send()
            .await
            .map_err(CatalogError::Unreachable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Rejected(status.as_u16()));
        }
        Ok(())
    }
}
