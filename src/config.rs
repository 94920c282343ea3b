//! Configuration for jellyroku
//!
//! Settings come from the command line or environment and are frozen into
//! a [`Config`] once at startup. Clients get what they need from it at
//! construction time and never look at the environment again.
//!
//! The library list shown on the index lives in a TOML file, by default
//! `~/.config/jellyroku/libraries.toml`:
//!
//! ```toml
//! [[library]]
//! id = "f137a2dd21bbc1b99aa5c0f6bf02a805"
//! name = "Movies"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::models::Library;

/// Immutable process configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Jellyfin base URL
    pub jellyfin_url: String,
    /// Static Jellyfin API token
    pub api_key: String,
    /// User whose played state is reset
    pub user_id: String,
    /// Roku ECP base URL
    pub roku_url: String,
    /// Roku channel id of the Jellyfin app
    pub channel_id: String,
    /// Library listed on `/series/`
    pub default_library: String,
    /// Public URL of a GoRoku remote, echoed on the index
    pub goroku_url: String,
    /// Libraries listed on the index
    pub libraries: Vec<Library>,
}

impl Config {
    /// Default library file path (~/.config/jellyroku/libraries.toml)
    pub fn default_libraries_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("jellyroku").join("libraries.toml"))
    }

    /// Attach the library list, replacing any previous one
    pub fn with_libraries(mut self, libraries: Vec<Library>) -> Self {
        self.libraries = libraries;
        self
    }

    /// Jellyfin base URL without a trailing slash
    pub fn jellyfin_base(&self) -> &str {
        self.jellyfin_url.trim_end_matches('/')
    }

    /// Roku base URL without a trailing slash
    pub fn roku_base(&self) -> &str {
        self.roku_url.trim_end_matches('/')
    }
}

#[derive(Debug, Default, Deserialize)]
struct LibraryFile {
    #[serde(default)]
    library: Vec<LibraryEntry>,
}

#[derive(Debug, Deserialize)]
struct LibraryEntry {
    id: String,
    #[serde(default)]
    name: String,
}

/// Load the library list, or an empty list if the file is missing or broken
pub fn load_libraries(path: &Path) -> Vec<Library> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no library file");
            return Vec::new();
        }
    };

    match parse_libraries(&text) {
        Ok(libraries) => libraries,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring malformed library file");
            Vec::new()
        }
    }
}

/// Parse the TOML library list
pub fn parse_libraries(text: &str) -> Result<Vec<Library>, toml::de::Error> {
    let file: LibraryFile = toml::from_str(text)?;
    Ok(file
        .library
        .into_iter()
        .map(|e| Library {
            id: e.id,
            name: e.name,
        })
        .collect())
}
