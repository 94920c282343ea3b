//! API clients for external services
//!
//! - Jellyfin: catalog lookups and played-state reset

pub mod jellyfin;

pub use jellyfin::{Catalog, JellyfinClient, EPISODE_FILTER};
