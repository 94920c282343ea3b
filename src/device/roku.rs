//! Roku launch control
//!
//! The Roku's External Control Protocol starts a channel with deep-link
//! parameters. The Jellyfin channel accepts `contentID` and `mediaType`
//! and starts the item immediately.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::DeviceError;
use crate::models::MediaKind;

/// Something that can start playback of a catalog item
#[async_trait]
pub trait Launcher: Send + Sync {
    /// Issue one launch command; never retried
    async fn launch(&self, content_id: &str, media_kind: MediaKind) -> Result<(), DeviceError>;
}

/// Roku ECP client
#[derive(Debug, Clone)]
pub struct RokuClient {
    base_url: String,
    channel_id: String,
    client: reqwest::Client,
}

impl RokuClient {
    /// Create a client from the process configuration
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(config.roku_base(), &config.channel_id)
    }

    /// Create a client with an explicit base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            channel_id: channel_id.into(),
            client: reqwest::Client::new(),
        }
    }

    /// URL of the launch endpoint for the configured channel
    pub fn launch_url(&self) -> String {
        format!(
            "{}/launch/{}",
            self.base_url,
            urlencoding::encode(&self.channel_id)
        )
    }
}

#[async_trait]
impl Launcher for RokuClient {
    #[instrument(skip(self))]
    async fn launch(&self, content_id: &str, media_kind: MediaKind) -> Result<(), DeviceError> {
        let response = self
            .client
            .post(self.launch_url())
            .query(&[("contentID", content_id), ("mediaType", media_kind.as_str())])
            .body("")
            .send()
            .await
            .map_err(DeviceError::Unreachable)?;

        let status = response.status();
        debug!(channel = %self.channel_id, status = status.as_u16(), "roku answered launch");
        if !status.is_success() {
            return Err(DeviceError::Rejected(status.as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_url() {
        let client = RokuClient::with_base_url("http://192.168.1.20:8060", "592369");
        assert_eq!(client.launch_url(), "http://192.168.1.20:8060/launch/592369");
    }

    #[test]
    fn test_new_from_config() {
        let config = Config {
            roku_url: "http://roku:8060/".into(),
            channel_id: "592369".into(),
            ..Default::default()
        };
        let client = RokuClient::new(&config);
        assert_eq!(client.launch_url(), "http://roku:8060/launch/592369");
    }
}
