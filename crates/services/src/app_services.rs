use std::sync::Arc;
use std::time::Duration;

use selector_core::model::Taxonomy;
use selector_core::scorm::ScormVersion;
use storage::repository::{AttemptKey, Storage, StorageError};
use tracing::info;

use crate::Clock;
use crate::checklist_service::ChecklistService;
use crate::error::AppServicesError;
use crate::local_lms::{CommitWriter, LocalLms};
use crate::scorm::{FrameTree, ScormConfig, ScormSession};

/// How the checklist is launched on the desktop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub course_id: String,
    pub learner_id: String,
    pub version: ScormVersion,
    /// Host a local LMS in the launcher frame. Without it the session finds
    /// no API and runs against the no-op stand-in (or fails in strict mode).
    pub bind_local_lms: bool,
    /// Discard the stored attempt before opening, so the learner starts over.
    pub restart_attempt: bool,
    pub scorm: ScormConfig,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            course_id: "competency-selector".to_owned(),
            learner_id: "local".to_owned(),
            version: ScormVersion::Scorm12,
            bind_local_lms: true,
            restart_attempt: false,
            scorm: ScormConfig::default(),
        }
    }
}

/// Assembles app-facing services over a launcher/content frame pair.
#[derive(Clone)]
pub struct AppServices {
    taxonomy: Arc<Taxonomy>,
    checklist: Arc<ChecklistService>,
    local_lms: Option<Arc<LocalLms>>,
}

impl AppServices {
    /// Build services backed by `storage`.
    ///
    /// The returned [`CommitWriter`] must be spawned for commits to reach
    /// storage; it is `None` when no local LMS is bound.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the stored attempt cannot be loaded or,
    /// with `restart_attempt`, cannot be discarded.
    pub async fn new_local(
        storage: &Storage,
        taxonomy: Taxonomy,
        options: LaunchOptions,
        clock: Clock,
    ) -> Result<(Self, Option<CommitWriter>), AppServicesError> {
        let taxonomy = Arc::new(taxonomy);
        let mut frames = FrameTree::new();
        let launcher = frames.top();
        let content = frames.add_child(launcher);
        frames.set_current(content);

        let (local_lms, writer) = if options.bind_local_lms {
            let key = AttemptKey::new(options.course_id, options.learner_id);
            if options.restart_attempt {
                match storage.attempts.delete_attempt(&key).await {
                    Ok(()) => info!(attempt = %key, "stored attempt discarded"),
                    Err(StorageError::NotFound) => {}
                    Err(err) => return Err(err.into()),
                }
            }
            let lms = LocalLms::open(storage.attempts.as_ref(), key, options.version, clock).await?;
            let (lms, writer) = lms.with_commit_writer(Arc::clone(&storage.attempts));
            let lms = Arc::new(lms);
            lms.bind(&mut frames, launcher);
            (Some(lms), Some(writer))
        } else {
            info!("no local LMS bound; content will look for a host API only");
            (None, None)
        };

        let session = ScormSession::new(Arc::new(frames), options.scorm);
        let checklist = Arc::new(ChecklistService::new(
            Arc::clone(&taxonomy),
            session,
            clock,
        ));

        Ok((
            Self {
                taxonomy,
                checklist,
                local_lms,
            },
            writer,
        ))
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the
    /// stored attempt cannot be loaded.
    pub async fn new_sqlite(
        db_url: &str,
        taxonomy: Taxonomy,
        options: LaunchOptions,
        clock: Clock,
    ) -> Result<(Self, Option<CommitWriter>), AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::new_local(&storage, taxonomy, options, clock).await
    }

    #[must_use]
    pub fn taxonomy(&self) -> Arc<Taxonomy> {
        Arc::clone(&self.taxonomy)
    }

    #[must_use]
    pub fn checklist(&self) -> Arc<ChecklistService> {
        Arc::clone(&self.checklist)
    }

    #[must_use]
    pub fn local_lms(&self) -> Option<Arc<LocalLms>> {
        self.local_lms.clone()
    }

    /// Wait for queued commits to be saved. `true` when nothing is pending.
    #[must_use]
    pub fn flush(&self, timeout: Duration) -> bool {
        self.local_lms
            .as_ref()
            .is_none_or(|lms| lms.wait_for_writer(timeout))
    }
}
