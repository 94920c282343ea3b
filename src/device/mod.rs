//! Playback devices
//!
//! - Roku: launches the Jellyfin channel via the External Control Protocol

pub mod roku;

pub use roku::{Launcher, RokuClient};
