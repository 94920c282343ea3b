//! Data structures shared across the crate
//!
//! Organized by domain:
//! - **Catalog**: Jellyfin items, seasons, episodes and listing pages
//! - **Libraries**: configured library entries shown on the index
//! - **Playback**: the single playable selection handed to the Roku

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Catalog Models (Jellyfin)
// =============================================================================

/// Kind of a catalog item as reported in its `Type` field
///
/// Anything the resolver does not know how to play collapses to `Unknown`,
/// including a missing `Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ItemKind {
    Movie,
    Episode,
    Series,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Movie => write!(f, "Movie"),
            ItemKind::Episode => write!(f, "Episode"),
            ItemKind::Series => write!(f, "Series"),
            ItemKind::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Image tags attached to an item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageTags {
    #[serde(default)]
    pub primary: String,
}

/// An item from the Jellyfin catalog
///
/// Identity is `id`; the rest is display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "Type", default)]
    pub kind: ItemKind,
    #[serde(default)]
    pub image_tags: ImageTags,
}

impl CatalogItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            image_tags: ImageTags::default(),
        }
    }
}

impl fmt::Display for CatalogItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] ({})", self.name, self.kind, self.id)
    }
}

/// A season of a series
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Season {
    pub id: String,
}

/// A single, directly playable episode
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Episode {
    pub id: String,
}

impl Episode {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl From<CatalogItem> for Episode {
    fn from(item: CatalogItem) -> Self {
        Self { id: item.id }
    }
}

/// One page of `/Items` results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemPage {
    #[serde(default)]
    pub items: Vec<CatalogItem>,
    #[serde(default)]
    pub total_record_count: u32,
}

/// Wrapper for the `{ "Items": [...] }` envelope used by the show endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ItemsEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

// =============================================================================
// Libraries
// =============================================================================

/// A library shown on the index page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Library {
    pub id: String,
    pub name: String,
}

/// A library together with its current listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LibraryListing {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub page: ItemPage,
}

// =============================================================================
// Playback
// =============================================================================

/// Media type understood by the Roku Jellyfin channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Movie,
    Episode,
}

impl MediaKind {
    /// The literal passed as `mediaType` on launch
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "Movie",
            MediaKind::Episode => "Episode",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The one concrete item a request resolves to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayableSelection {
    pub item_id: String,
    pub media_kind: MediaKind,
}

impl PlayableSelection {
    pub fn movie(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            media_kind: MediaKind::Movie,
        }
    }

    pub fn episode(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            media_kind: MediaKind::Episode,
        }
    }
}

impl fmt::Display for PlayableSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.item_id, self.media_kind)
    }
}
