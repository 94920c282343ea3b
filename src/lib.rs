//! jellyroku - play Jellyfin items on a Roku, from the beginning
//!
//! Pick a movie, an episode or a whole series from a Jellyfin catalog and
//! start it on a Roku. Series are flattened into their episodes and one is
//! drawn at random. Played state is cleared first so playback starts at zero.
//!
//! # Modules
//!
//! - `models` - Catalog items, seasons, episodes, playable selections
//! - `api` - Jellyfin catalog client
//! - `device` - Roku launch client
//! - `resolver` - Item resolution and series flattening
//! - `player` - Play request flow (resolve, reset, launch)
//! - `server` - HTTP control surface
//! - `config` / `cli` / `commands` - process setup

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod device;
pub mod error;
pub mod models;
pub mod player;
pub mod resolver;
pub mod server;

// Re-export commonly used types
pub use models::{
    CatalogItem, Episode, ItemKind, ItemPage, Library, MediaKind, PlayableSelection, Season,
};

pub use api::{Catalog, JellyfinClient};
pub use config::Config;
pub use device::{Launcher, RokuClient};
pub use error::{CatalogError, DeviceError, PlayError};
pub use player::{PlayOutcome, PlayService, PlayStage};
pub use resolver::{Flatten, ItemResolver};
pub use server::AppState;
