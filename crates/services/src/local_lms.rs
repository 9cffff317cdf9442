//! A local SCORM run-time for desktop launches.
//!
//! There is no LMS window around a desktop build, so the binary hosts this
//! runtime in the launcher frame. It keeps the data model of one attempt in
//! memory, enforces the run-time error codes of the version it serves and
//! hands every commit to a background [`CommitWriter`].

use std::collections::BTreeMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use selector_core::Clock;
use selector_core::scorm::{
    CmiElement, CompletionStatus, ElementAccess, ExitMode, Scorm12Api, Scorm2004Api,
    ScormVersion, bool_str, codes,
};
use storage::repository::{AttemptKey, AttemptRecord, AttemptRepository};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::error::LocalLmsError;
use crate::scorm::{FrameId, FrameTree};

/// Lifecycle of the runtime as seen by the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LmsState {
    NotInitialized,
    Running,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fault {
    AlreadyInitialized,
    InitAfterTerminate,
    TerminateBeforeInit,
    TerminateAfterTerminate,
    GetBeforeInit,
    GetAfterTerminate,
    SetBeforeInit,
    SetAfterTerminate,
    CommitBeforeInit,
    CommitAfterTerminate,
    CommitFailed,
    InvalidArgument,
    Undefined,
    ReadOnly,
    WriteOnly,
    TypeMismatch,
    OutOfRange,
}

impl Fault {
    fn code(self, version: ScormVersion) -> u16 {
        match version {
            ScormVersion::Scorm12 => match self {
                Self::TerminateBeforeInit
                | Self::GetBeforeInit
                | Self::SetBeforeInit
                | Self::CommitBeforeInit => codes::NOT_INITIALIZED_12,
                Self::AlreadyInitialized
                | Self::InitAfterTerminate
                | Self::TerminateAfterTerminate
                | Self::GetAfterTerminate
                | Self::SetAfterTerminate
                | Self::CommitAfterTerminate
                | Self::CommitFailed => codes::GENERAL_EXCEPTION,
                Self::InvalidArgument => codes::INVALID_ARGUMENT,
                Self::Undefined => codes::UNDEFINED_ELEMENT,
                Self::ReadOnly => codes::READ_ONLY_12,
                Self::WriteOnly => codes::WRITE_ONLY_12,
                Self::TypeMismatch | Self::OutOfRange => codes::TYPE_MISMATCH_12,
            },
            ScormVersion::Scorm2004 => match self {
                Self::AlreadyInitialized => codes::ALREADY_INITIALIZED,
                Self::InitAfterTerminate => codes::CONTENT_INSTANCE_TERMINATED,
                Self::TerminateBeforeInit => codes::TERMINATION_BEFORE_INIT,
                Self::TerminateAfterTerminate => codes::TERMINATION_AFTER_TERMINATION,
                Self::GetBeforeInit => codes::RETRIEVE_BEFORE_INIT,
                Self::GetAfterTerminate => codes::RETRIEVE_AFTER_TERMINATION,
                Self::SetBeforeInit => codes::STORE_BEFORE_INIT,
                Self::SetAfterTerminate => codes::STORE_AFTER_TERMINATION,
                Self::CommitBeforeInit => codes::COMMIT_BEFORE_INIT,
                Self::CommitAfterTerminate => codes::COMMIT_AFTER_TERMINATION,
                Self::CommitFailed => codes::GENERAL_COMMIT_FAILURE_2004,
                Self::InvalidArgument => codes::INVALID_ARGUMENT,
                Self::Undefined => codes::UNDEFINED_ELEMENT,
                Self::ReadOnly => codes::READ_ONLY_2004,
                Self::WriteOnly => codes::WRITE_ONLY_2004,
                Self::TypeMismatch => codes::TYPE_MISMATCH_2004,
                Self::OutOfRange => codes::OUT_OF_RANGE_2004,
            },
        }
    }
}

#[derive(Debug)]
struct Rejection {
    fault: Fault,
    detail: String,
}

fn reject<T>(fault: Fault, detail: impl Into<String>) -> Result<T, Rejection> {
    Err(Rejection {
        fault,
        detail: detail.into(),
    })
}

/// `GetErrorString` text for a code in the given version.
#[must_use]
pub fn error_message(version: ScormVersion, code: u16) -> &'static str {
    match (version, code) {
        (_, 0) => "No error",
        (_, 101) => "General exception",
        (ScormVersion::Scorm12, 201) => "Invalid argument error",
        (ScormVersion::Scorm12, 202) => "Element cannot have children",
        (ScormVersion::Scorm12, 203) => "Element not an array - cannot have count",
        (ScormVersion::Scorm12, 301) => "Not initialized",
        (ScormVersion::Scorm12, 401) => "Not implemented error",
        (ScormVersion::Scorm12, 402) => "Invalid set value, element is a keyword",
        (ScormVersion::Scorm12, 403) => "Element is read only",
        (ScormVersion::Scorm12, 404) => "Element is write only",
        (ScormVersion::Scorm12, 405) => "Incorrect data type",
        (ScormVersion::Scorm2004, 102) => "General Initialization Failure",
        (ScormVersion::Scorm2004, 103) => "Already Initialized",
        (ScormVersion::Scorm2004, 104) => "Content Instance Terminated",
        (ScormVersion::Scorm2004, 111) => "General Termination Failure",
        (ScormVersion::Scorm2004, 112) => "Termination Before Initialization",
        (ScormVersion::Scorm2004, 113) => "Termination After Termination",
        (ScormVersion::Scorm2004, 122) => "Retrieve Data Before Initialization",
        (ScormVersion::Scorm2004, 123) => "Retrieve Data After Termination",
        (ScormVersion::Scorm2004, 132) => "Store Data Before Initialization",
        (ScormVersion::Scorm2004, 133) => "Store Data After Termination",
        (ScormVersion::Scorm2004, 142) => "Commit Before Initialization",
        (ScormVersion::Scorm2004, 143) => "Commit After Termination",
        (ScormVersion::Scorm2004, 201) => "General Argument Error",
        (ScormVersion::Scorm2004, 301) => "General Get Failure",
        (ScormVersion::Scorm2004, 351) => "General Set Failure",
        (ScormVersion::Scorm2004, 391) => "General Commit Failure",
        (ScormVersion::Scorm2004, 401) => "Undefined Data Model Element",
        (ScormVersion::Scorm2004, 402) => "Unimplemented Data Model Element",
        (ScormVersion::Scorm2004, 403) => "Data Model Element Value Not Initialized",
        (ScormVersion::Scorm2004, 404) => "Data Model Element Is Read Only",
        (ScormVersion::Scorm2004, 405) => "Data Model Element Is Write Only",
        (ScormVersion::Scorm2004, 406) => "Data Model Element Type Mismatch",
        (ScormVersion::Scorm2004, 407) => "Data Model Element Value Out Of Range",
        (ScormVersion::Scorm2004, 408) => "Data Model Dependency Not Established",
        _ => "",
    }
}

struct LmsData {
    state: LmsState,
    values: BTreeMap<String, String>,
    last_error: u16,
    diagnostic: String,
    commit_count: u32,
    last_commit: Option<AttemptRecord>,
}

/// Highest commit number the writer has handled, shared with the runtime.
#[derive(Default)]
struct WriterProgress {
    handled: Mutex<u32>,
    changed: Condvar,
}

impl WriterProgress {
    fn mark(&self, commit: u32) {
        let mut handled = self.handled.lock().unwrap_or_else(PoisonError::into_inner);
        *handled = (*handled).max(commit);
        self.changed.notify_all();
    }

    fn wait_for(&self, commit: u32, timeout: Duration) -> bool {
        let handled = self.handled.lock().unwrap_or_else(PoisonError::into_inner);
        let (handled, _) = self
            .changed
            .wait_timeout_while(handled, timeout, |handled| *handled < commit)
            .unwrap_or_else(PoisonError::into_inner);
        *handled >= commit
    }
}

/// In-process SCORM runtime serving one attempt.
pub struct LocalLms {
    key: AttemptKey,
    version: ScormVersion,
    clock: Clock,
    data: Mutex<LmsData>,
    sink: Option<UnboundedSender<AttemptRecord>>,
    progress: Arc<WriterProgress>,
}

impl std::fmt::Debug for LocalLms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalLms")
            .field("key", &self.key)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl LocalLms {
    /// Build a runtime seeded from `prior`, the last stored state of the attempt.
    #[must_use]
    pub fn new(
        key: AttemptKey,
        version: ScormVersion,
        clock: Clock,
        prior: Option<&AttemptRecord>,
    ) -> Self {
        let mut values = BTreeMap::new();
        let mut commit_count = 0;
        let entry = match prior {
            Some(record) => {
                commit_count = record.commit_count;
                let suspended = record
                    .values
                    .get(CmiElement::Exit.key(version))
                    .is_some_and(|exit| exit == "suspend");
                values.extend(record.values.clone());
                if suspended { "resume" } else { "" }
            }
            None => "ab-initio",
        };

        // Exit and session time describe a single session.
        values.remove(CmiElement::Exit.key(version));
        values.remove(CmiElement::SessionTime.key(version));

        let initial_status = match version {
            ScormVersion::Scorm12 => CompletionStatus::NotAttempted,
            ScormVersion::Scorm2004 => CompletionStatus::Unknown,
        };
        values
            .entry(CmiElement::CompletionStatus.key(version).to_owned())
            .or_insert_with(|| initial_status.as_str().to_owned());
        for element in [
            CmiElement::SuspendData,
            CmiElement::LessonLocation,
            CmiElement::ScoreRaw,
        ] {
            values.entry(element.key(version).to_owned()).or_default();
        }
        values.insert(CmiElement::Entry.key(version).to_owned(), entry.to_owned());
        values.insert(
            CmiElement::LearnerId.key(version).to_owned(),
            key.learner_id.clone(),
        );
        values.insert(
            CmiElement::LearnerName.key(version).to_owned(),
            key.learner_id.clone(),
        );

        Self {
            key,
            version,
            clock,
            data: Mutex::new(LmsData {
                state: LmsState::NotInitialized,
                values,
                last_error: codes::NO_ERROR,
                diagnostic: String::new(),
                commit_count,
                last_commit: None,
            }),
            sink: None,
            progress: Arc::new(WriterProgress::default()),
        }
    }

    /// Load the stored attempt for `key` and build a runtime on top of it.
    ///
    /// # Errors
    ///
    /// Returns `LocalLmsError::Storage` if the attempt cannot be loaded and
    /// `VersionMismatch` if it was recorded under the other SCORM version.
    pub async fn open(
        repo: &dyn AttemptRepository,
        key: AttemptKey,
        version: ScormVersion,
        clock: Clock,
    ) -> Result<Self, LocalLmsError> {
        let prior = repo.load_attempt(&key).await?;
        if let Some(record) = &prior
            && record.version != version
        {
            return Err(LocalLmsError::VersionMismatch {
                stored: record.version,
                requested: version,
            });
        }
        info!(attempt = %key, %version, resumed = prior.is_some(), "opened local attempt");
        Ok(Self::new(key, version, clock, prior.as_ref()))
    }

    /// Route commits to a [`CommitWriter`] that saves them into `repo`.
    #[must_use]
    pub fn with_commit_writer(mut self, repo: Arc<dyn AttemptRepository>) -> (Self, CommitWriter) {
        let (tx, rx) = mpsc::unbounded_channel();
        self.sink = Some(tx);
        let writer = CommitWriter {
            repo,
            commits: rx,
            progress: Arc::clone(&self.progress),
        };
        (self, writer)
    }

    /// Bind this runtime on `frame` under the binding name of its version.
    pub fn bind(self: &Arc<Self>, tree: &mut FrameTree, frame: FrameId) {
        match self.version {
            ScormVersion::Scorm12 => tree.bind_12(frame, Arc::clone(self) as Arc<dyn Scorm12Api>),
            ScormVersion::Scorm2004 => {
                tree.bind_2004(frame, Arc::clone(self) as Arc<dyn Scorm2004Api>);
            }
        }
    }

    #[must_use]
    pub fn key(&self) -> &AttemptKey {
        &self.key
    }

    #[must_use]
    pub fn version(&self) -> ScormVersion {
        self.version
    }

    #[must_use]
    pub fn state(&self) -> LmsState {
        self.lock().state
    }

    /// Current value of an element, bypassing access rules.
    #[must_use]
    pub fn value(&self, element: CmiElement) -> Option<String> {
        self.lock().values.get(element.key(self.version)).cloned()
    }

    #[must_use]
    pub fn commit_count(&self) -> u32 {
        self.lock().commit_count
    }

    /// Snapshot produced by the most recent commit of this session.
    #[must_use]
    pub fn last_commit(&self) -> Option<AttemptRecord> {
        self.lock().last_commit.clone()
    }

    /// Block until the writer has handled every commit made so far.
    ///
    /// Returns `true` immediately when no writer is attached, `false` on timeout.
    #[must_use]
    pub fn wait_for_writer(&self, timeout: Duration) -> bool {
        if self.sink.is_none() {
            return true;
        }
        let target = self.commit_count();
        self.progress.wait_for(target, timeout)
    }

    fn lock(&self) -> MutexGuard<'_, LmsData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn settle<T>(&self, data: &mut LmsData, result: Result<T, Rejection>) -> Option<T> {
        match result {
            Ok(value) => {
                data.last_error = codes::NO_ERROR;
                data.diagnostic.clear();
                Some(value)
            }
            Err(rejection) => {
                let code = rejection.fault.code(self.version);
                debug!(code, detail = %rejection.detail, "local LMS rejected call");
                data.last_error = code;
                data.diagnostic = rejection.detail;
                None
            }
        }
    }

    fn run_bool(&self, op: impl FnOnce(&mut LmsData) -> Result<(), Rejection>) -> String {
        let mut data = self.lock();
        let result = op(&mut data);
        bool_str(self.settle(&mut data, result).is_some())
    }

    fn call_initialize(&self, arg: &str) -> String {
        self.run_bool(|data| {
            require_empty(arg)?;
            match data.state {
                LmsState::Running => reject(Fault::AlreadyInitialized, "already initialized"),
                LmsState::Terminated => {
                    reject(Fault::InitAfterTerminate, "attempt already terminated")
                }
                LmsState::NotInitialized => {
                    data.state = LmsState::Running;
                    debug!(attempt = %self.key, "local LMS initialized");
                    Ok(())
                }
            }
        })
    }

    fn call_terminate(&self, arg: &str) -> String {
        self.run_bool(|data| {
            require_empty(arg)?;
            match data.state {
                LmsState::NotInitialized => reject(Fault::TerminateBeforeInit, "not initialized"),
                LmsState::Terminated => {
                    reject(Fault::TerminateAfterTerminate, "already terminated")
                }
                LmsState::Running => {
                    self.commit_locked(data)?;
                    data.state = LmsState::Terminated;
                    info!(
                        attempt = %self.key,
                        commits = data.commit_count,
                        "local attempt terminated"
                    );
                    Ok(())
                }
            }
        })
    }

    fn call_get_value(&self, key: &str) -> String {
        let mut data = self.lock();
        let result = self.read(&data, key);
        self.settle(&mut data, result).unwrap_or_default()
    }

    fn read(&self, data: &LmsData, key: &str) -> Result<String, Rejection> {
        match data.state {
            LmsState::NotInitialized => return reject(Fault::GetBeforeInit, "not initialized"),
            LmsState::Terminated => return reject(Fault::GetAfterTerminate, "already terminated"),
            LmsState::Running => {}
        }
        let element = self.element(key)?;
        if element.access() == ElementAccess::WriteOnly {
            return reject(Fault::WriteOnly, format!("{key} is write-only"));
        }
        Ok(data.values.get(key).cloned().unwrap_or_default())
    }

    fn call_set_value(&self, key: &str, value: &str) -> String {
        self.run_bool(|data| {
            match data.state {
                LmsState::NotInitialized => return reject(Fault::SetBeforeInit, "not initialized"),
                LmsState::Terminated => {
                    return reject(Fault::SetAfterTerminate, "already terminated");
                }
                LmsState::Running => {}
            }
            let element = self.element(key)?;
            if element.access() == ElementAccess::ReadOnly {
                return reject(Fault::ReadOnly, format!("{key} is read-only"));
            }
            self.validate(element, key, value)?;
            data.values.insert(key.to_owned(), value.to_owned());
            Ok(())
        })
    }

    fn call_commit(&self, arg: &str) -> String {
        self.run_bool(|data| {
            require_empty(arg)?;
            match data.state {
                LmsState::NotInitialized => reject(Fault::CommitBeforeInit, "not initialized"),
                LmsState::Terminated => reject(Fault::CommitAfterTerminate, "already terminated"),
                LmsState::Running => self.commit_locked(data),
            }
        })
    }

    fn call_get_last_error(&self) -> String {
        self.lock().last_error.to_string()
    }

    fn call_get_error_string(&self, code: &str) -> String {
        code.trim()
            .parse()
            .map(|code| error_message(self.version, code))
            .unwrap_or_default()
            .to_owned()
    }

    fn call_get_diagnostic(&self, code: &str) -> String {
        let data = self.lock();
        let code = code.trim();
        if code.is_empty() || code == data.last_error.to_string() {
            return data.diagnostic.clone();
        }
        drop(data);
        self.call_get_error_string(code)
    }

    fn element(&self, key: &str) -> Result<CmiElement, Rejection> {
        if key.trim().is_empty() {
            return reject(Fault::InvalidArgument, "element name is empty");
        }
        CmiElement::from_key(self.version, key).map_or_else(
            || reject(Fault::Undefined, format!("{key} is not supported")),
            Ok,
        )
    }

    fn validate(&self, element: CmiElement, key: &str, value: &str) -> Result<(), Rejection> {
        let version = self.version;
        match element {
            CmiElement::CompletionStatus => {
                let valid = value
                    .parse::<CompletionStatus>()
                    .is_ok_and(|status| status.is_valid_for(version));
                if !valid {
                    return reject(Fault::TypeMismatch, format!("'{value}' is not a valid {key}"));
                }
            }
            CmiElement::Exit => {
                let valid = ExitMode::parse_cmi(value).is_ok()
                    && !(version == ScormVersion::Scorm12 && value.trim() == "normal");
                if !valid {
                    return reject(Fault::TypeMismatch, format!("'{value}' is not a valid {key}"));
                }
            }
            CmiElement::SuspendData => {
                let limit = version.suspend_data_limit();
                let len = value.chars().count();
                if len > limit {
                    return reject(
                        Fault::OutOfRange,
                        format!("{key} is {len} characters, limit is {limit}"),
                    );
                }
            }
            CmiElement::ScoreRaw => {
                let blank_allowed = version == ScormVersion::Scorm12 && value.is_empty();
                let in_range = value.parse::<f64>().is_ok_and(|score| match version {
                    ScormVersion::Scorm12 => (0.0..=100.0).contains(&score),
                    ScormVersion::Scorm2004 => score.is_finite(),
                });
                if !blank_allowed && !in_range {
                    return reject(Fault::TypeMismatch, format!("'{value}' is not a valid {key}"));
                }
            }
            CmiElement::SessionTime
            | CmiElement::LessonLocation
            | CmiElement::Entry
            | CmiElement::LearnerId
            | CmiElement::LearnerName => {}
        }
        Ok(())
    }

    fn commit_locked(&self, data: &mut LmsData) -> Result<(), Rejection> {
        data.commit_count += 1;
        let values = data
            .values
            .iter()
            .filter(|(key, _)| {
                CmiElement::from_key(self.version, key)
                    .is_some_and(|element| element.access() != ElementAccess::ReadOnly)
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let record = AttemptRecord {
            key: self.key.clone(),
            version: self.version,
            values,
            commit_count: data.commit_count,
            committed_at: self.clock.now(),
        };
        data.last_commit = Some(record.clone());

        if let Some(sink) = &self.sink
            && sink.send(record).is_err()
        {
            warn!(attempt = %self.key, "commit writer has stopped; commit not persisted");
            return reject(Fault::CommitFailed, "commit writer has stopped");
        }
        debug!(attempt = %self.key, commit = data.commit_count, "commit queued");
        Ok(())
    }
}

fn require_empty(arg: &str) -> Result<(), Rejection> {
    if arg.is_empty() {
        Ok(())
    } else {
        reject(Fault::InvalidArgument, "argument must be an empty string")
    }
}

impl Scorm12Api for LocalLms {
    fn lms_initialize(&self, arg: &str) -> String {
        self.call_initialize(arg)
    }

    fn lms_finish(&self, arg: &str) -> String {
        self.call_terminate(arg)
    }

    fn lms_get_value(&self, element: &str) -> String {
        self.call_get_value(element)
    }

    fn lms_set_value(&self, element: &str, value: &str) -> String {
        self.call_set_value(element, value)
    }

    fn lms_commit(&self, arg: &str) -> String {
        self.call_commit(arg)
    }

    fn lms_get_last_error(&self) -> String {
        self.call_get_last_error()
    }

    fn lms_get_error_string(&self, code: &str) -> String {
        self.call_get_error_string(code)
    }

    fn lms_get_diagnostic(&self, code: &str) -> String {
        self.call_get_diagnostic(code)
    }
}

impl Scorm2004Api for LocalLms {
    fn initialize(&self, arg: &str) -> String {
        self.call_initialize(arg)
    }

    fn terminate(&self, arg: &str) -> String {
        self.call_terminate(arg)
    }

    fn get_value(&self, element: &str) -> String {
        self.call_get_value(element)
    }

    fn set_value(&self, element: &str, value: &str) -> String {
        self.call_set_value(element, value)
    }

    fn commit(&self, arg: &str) -> String {
        self.call_commit(arg)
    }

    fn get_last_error(&self) -> String {
        self.call_get_last_error()
    }

    fn get_error_string(&self, code: &str) -> String {
        self.call_get_error_string(code)
    }

    fn get_diagnostic(&self, code: &str) -> String {
        self.call_get_diagnostic(code)
    }
}

/// Background task that saves committed snapshots.
pub struct CommitWriter {
    repo: Arc<dyn AttemptRepository>,
    commits: UnboundedReceiver<AttemptRecord>,
    progress: Arc<WriterProgress>,
}

impl CommitWriter {
    /// Save commits until every sender is gone. A backlog is collapsed to its
    /// newest snapshot since each record replaces the previous one.
    pub async fn run(mut self) {
        while let Some(mut record) = self.commits.recv().await {
            while let Ok(newer) = self.commits.try_recv() {
                record = newer;
            }
            match self.repo.save_attempt(&record).await {
                Ok(()) => {
                    debug!(attempt = %record.key, commit = record.commit_count, "attempt saved");
                }
                Err(err) => {
                    warn!(
                        attempt = %record.key,
                        commit = record.commit_count,
                        %err,
                        "failed to save attempt"
                    );
                }
            }
            self.progress.mark(record.commit_count);
        }
        debug!("commit writer stopped");
    }
}
