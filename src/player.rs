//! Play requests
//!
//! Ties resolution, progress reset and launch together for one request:
//!
//! ```text
//! Received -> Resolving -> Resolved -> ResettingProgress -> Dispatching -> Dispatched
//!                 |                                             |
//!                 +---------------> Failed <--------------------+
//! ```
//!
//! A failed progress reset is logged and playback goes ahead anyway. The
//! item just won't start from zero.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::api::Catalog;
use crate::device::Launcher;
use crate::error::PlayError;
use crate::models::PlayableSelection;
use crate::resolver::ItemResolver;

/// Stage of a single play request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlayStage {
    Received,
    Resolving,
    Resolved,
    ResettingProgress,
    Dispatching,
    Dispatched,
    Failed,
}

impl PlayStage {
    /// Whether `next` may follow this stage
    pub fn allows(self, next: PlayStage) -> bool {
        use PlayStage::*;
        matches!(
            (self, next),
            (Received, Resolving)
                | (Resolving, Resolved)
                | (Resolving, Failed)
                | (Resolved, ResettingProgress)
                | (ResettingProgress, Dispatching)
                | (Dispatching, Dispatched)
                | (Dispatching, Failed)
        )
    }

    /// Terminal stages end the request
    pub fn is_terminal(self) -> bool {
        matches!(self, PlayStage::Dispatched | PlayStage::Failed)
    }
}

impl fmt::Display for PlayStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Result of a successful play request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayOutcome {
    /// What was sent to the device
    pub selection: PlayableSelection,
    /// False when the played-state reset failed and was skipped
    pub progress_reset: bool,
    /// Stages the request passed through
    pub stages: Vec<PlayStage>,
}

/// Records stage transitions for one request
struct StageLog {
    target: String,
    stages: Vec<PlayStage>,
}

impl StageLog {
    fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            stages: vec![PlayStage::Received],
        }
    }

    fn current(&self) -> PlayStage {
        self.stages.last().copied().unwrap_or(PlayStage::Received)
    }

    fn enter(&mut self, next: PlayStage) {
        debug_assert!(
            self.current().allows(next),
            "illegal transition {} -> {}",
            self.current(),
            next
        );
        debug!(target_id = %self.target, from = %self.current(), to = %next, "play stage");
        self.stages.push(next);
    }

    fn fail(&mut self, err: &PlayError) {
        error!(target_id = %self.target, stage = %self.current(), error = %err, "play request failed");
        self.enter(PlayStage::Failed);
    }
}

/// Handles play requests against one catalog and one device
pub struct PlayService {
    resolver: ItemResolver,
    catalog: Arc<dyn Catalog>,
    launcher: Arc<dyn Launcher>,
    user_id: String,
}

impl PlayService {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        launcher: Arc<dyn Launcher>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            resolver: ItemResolver::new(Arc::clone(&catalog)),
            catalog,
            launcher,
            user_id: user_id.into(),
        }
    }

    pub fn resolver(&self) -> &ItemResolver {
        &self.resolver
    }

    /// Resolve, reset progress and launch whatever `requested_id` names
    pub async fn play_request(&self, requested_id: &str) -> Result<PlayOutcome, PlayError> {
        info!(item_id = requested_id, "play request");
        let mut log = StageLog::new(requested_id);

        log.enter(PlayStage::Resolving);
        let selection = match self.resolver.resolve(requested_id).await {
            Ok(selection) => selection,
            Err(e) => {
                log.fail(&e);
                return Err(e);
            }
        };

        self.dispatch(selection, log).await
    }

    /// Launch a random episode from anywhere in a series
    pub async fn play_random_episode(&self, series_id: &str) -> Result<PlayOutcome, PlayError> {
        info!(series_id, "random episode request");
        let mut log = StageLog::new(series_id);

        log.enter(PlayStage::Resolving);
        let selection = match self.resolver.random_episode(series_id).await {
            Ok(selection) => selection,
            Err(e) => {
                log.fail(&e);
                return Err(e);
            }
        };

        self.dispatch(selection, log).await
    }

    async fn dispatch(
        &self,
        selection: PlayableSelection,
        mut log: StageLog,
    ) -> Result<PlayOutcome, PlayError> {
        log.enter(PlayStage::Resolved);

        log.enter(PlayStage::ResettingProgress);
        let progress_reset = match self
            .catalog
            .reset_progress(&self.user_id, &selection.item_id)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(item_id = %selection.item_id, error = %e, "could not reset played state, launching anyway");
                false
            }
        };

        log.enter(PlayStage::Dispatching);
        info!(%selection, "launching");
        if let Err(e) = self
            .launcher
            .launch(&selection.item_id, selection.media_kind)
            .await
        {
            let e = PlayError::from(e);
            log.fail(&e);
            return Err(e);
        }

        log.enter(PlayStage::Dispatched);
        Ok(PlayOutcome {
            selection,
            progress_reset,
            stages: log.stages,
        })
    }
}

impl fmt::Debug for PlayService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayService")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}
