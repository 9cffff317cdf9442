use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use selector_core::Clock;
use selector_core::model::{SelectionMap, Taxonomy};
use selector_core::scorm::{CmiElement, CompletionStatus, ExitMode, ScormVersion};
use selector_core::time::{format_duration_2004, format_timespan_12};
use tracing::{debug, info, warn};

use crate::scorm::{ScormSession, SessionState};

struct ChecklistState {
    session: ScormSession,
    last_saved: Option<String>,
    mounted_at: Option<DateTime<Utc>>,
}

/// Persists a checklist selection through a SCORM session.
///
/// Session failures never reach the caller: they are logged and the
/// checklist keeps working on its local selection.
pub struct ChecklistService {
    taxonomy: Arc<Taxonomy>,
    clock: Clock,
    state: Mutex<ChecklistState>,
}

impl ChecklistService {
    #[must_use]
    pub fn new(taxonomy: Arc<Taxonomy>, session: ScormSession, clock: Clock) -> Self {
        Self {
            taxonomy,
            clock,
            state: Mutex::new(ChecklistState {
                session,
                last_saved: None,
                mounted_at: None,
            }),
        }
    }

    #[must_use]
    pub fn taxonomy(&self) -> Arc<Taxonomy> {
        Arc::clone(&self.taxonomy)
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.lock().session.state()
    }

    /// Open the session and restore the stored selection.
    ///
    /// Returns an empty selection when the session cannot be opened or the
    /// stored data is unreadable.
    pub fn mount(&self) -> SelectionMap {
        let mut state = self.lock();
        if let Err(err) = state.session.initialize() {
            warn!(%err, "checklist session did not start");
            return SelectionMap::new();
        }
        state.mounted_at = Some(self.clock.now());

        let raw = state
            .session
            .get_element(CmiElement::SuspendData)
            .unwrap_or_default();
        let selection = SelectionMap::parse_suspend_data(&raw).unwrap_or_else(|err| {
            warn!(%err, "ignoring unreadable suspend data");
            SelectionMap::new()
        });
        info!(selected = selection.len(), "restored checklist selection");

        match state.session.status() {
            Ok(Some(CompletionStatus::NotAttempted | CompletionStatus::Unknown)) => {
                if let Err(err) = state.session.set_status(CompletionStatus::Incomplete) {
                    warn!(%err, "could not mark attempt incomplete");
                }
            }
            Ok(_) => {}
            Err(err) => warn!(%err, "could not read completion status"),
        }
        commit(&mut state.session);

        state.last_saved = Some(selection.to_suspend_data());
        selection
    }

    /// Store a changed selection and commit it.
    ///
    /// A snapshot identical to the last stored one is skipped.
    pub fn selection_changed(&self, selection: &SelectionMap) {
        let mut state = self.lock();
        if !state.session.is_active() {
            debug!("selection change ignored: session not active");
            return;
        }
        let data = selection.to_suspend_data();
        if state.last_saved.as_deref() == Some(data.as_str()) {
            return;
        }
        self.persist(&mut state, selection, data);
        commit(&mut state.session);
    }

    /// Page-unload path: persist, record the exit mode and commit. The
    /// session stays open.
    pub fn unload(&self, selection: &SelectionMap) {
        let mut state = self.lock();
        if !state.session.is_active() {
            debug!("unload ignored: session not active");
            return;
        }
        self.finish(&mut state, selection);
    }

    /// Component-teardown path: everything [`ChecklistService::unload`] does,
    /// then terminate the session.
    pub fn teardown(&self, selection: &SelectionMap) {
        let mut state = self.lock();
        if !state.session.is_active() {
            debug!("teardown ignored: session not active");
            return;
        }
        self.finish(&mut state, selection);
        match state.session.terminate() {
            Ok(()) => info!("checklist session closed"),
            Err(err) => warn!(%err, "checklist session did not close cleanly"),
        }
    }

    fn finish(&self, state: &mut ChecklistState, selection: &SelectionMap) {
        let data = selection.to_suspend_data();
        self.persist(state, selection, data);

        let exit = match state.session.status() {
            Ok(Some(CompletionStatus::Incomplete)) => ExitMode::Suspend,
            _ => ExitMode::Normal,
        };
        if let Err(err) = state.session.set_exit_mode(exit) {
            warn!(%err, "could not record exit mode");
        }

        if let (Some(started), Some(version)) = (state.mounted_at, state.session.version()) {
            let elapsed = self.clock.now() - started;
            let value = match version {
                ScormVersion::Scorm12 => format_timespan_12(elapsed),
                ScormVersion::Scorm2004 => format_duration_2004(elapsed),
            };
            if let Err(err) = state.session.set_element(CmiElement::SessionTime, &value) {
                warn!(%err, "could not record session time");
            }
        }
        commit(&mut state.session);
    }

    fn persist(&self, state: &mut ChecklistState, selection: &SelectionMap, data: String) {
        if let Err(err) = state.session.set_element(CmiElement::SuspendData, &data) {
            warn!(%err, "could not store selection");
        } else {
            state.last_saved = Some(data);
        }

        if self.taxonomy.selected_count(selection) == 0 {
            return;
        }
        match state.session.status() {
            Ok(Some(CompletionStatus::Completed)) => {}
            Ok(_) => {
                if let Err(err) = state.session.set_status(CompletionStatus::Completed) {
                    warn!(%err, "could not mark attempt completed");
                }
            }
            Err(err) => warn!(%err, "could not read completion status"),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ChecklistState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn commit(session: &mut ScormSession) {
    if let Err(err) = session.save() {
        warn!(%err, "commit failed");
    }
}
