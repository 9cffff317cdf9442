use std::sync::Arc;

use selector_core::scorm::{
    ApiHandle, CmiElement, CompletionStatus, ExitMode, LastError, ProtocolCall, ScormVersion,
    is_true,
};
use tracing::{debug, warn};

use super::config::ScormConfig;
use super::discovery::discover;
use super::frames::FrameHost;
use super::noop::NoOpApi;
use crate::error::ScormError;

/// Debug chatter, emitted only when the session's `debug` flag is on.
macro_rules! chatter {
    ($session:expr, $($arg:tt)*) => {
        if $session.config.debug {
            debug!($($arg)*);
        }
    };
}

/// Lifecycle of the connection to the host API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Active,
    Terminated,
}

/// Discovery outcome, resolved once per session.
#[derive(Debug, Clone)]
enum ApiSlot {
    Undiscovered,
    Found(ApiHandle),
    Missing,
}

/// One content session against a host API.
///
/// Discovery runs lazily on first use and its outcome (including a miss) is
/// kept for the lifetime of the session. A terminated session cannot be
/// re-initialized.
pub struct ScormSession {
    config: ScormConfig,
    host: Arc<dyn FrameHost>,
    slot: ApiSlot,
    state: SessionState,
    completion_status: Option<CompletionStatus>,
    completion_explicit: bool,
    exit_mode: Option<ExitMode>,
}

impl std::fmt::Debug for ScormSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScormSession")
            .field("config", &self.config)
            .field("slot", &self.slot)
            .field("state", &self.state)
            .field("completion_status", &self.completion_status)
            .field("exit_mode", &self.exit_mode)
            .finish_non_exhaustive()
    }
}

impl ScormSession {
    #[must_use]
    pub fn new(host: Arc<dyn FrameHost>, config: ScormConfig) -> Self {
        Self {
            config,
            host,
            slot: ApiSlot::Undiscovered,
            state: SessionState::Uninitialized,
            completion_status: None,
            completion_explicit: false,
            exit_mode: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> ScormConfig {
        self.config
    }

    /// Replace the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ScormError::AlreadyConfigured` once discovery has run.
    pub fn configure(&mut self, config: ScormConfig) -> Result<(), ScormError> {
        if !matches!(self.slot, ApiSlot::Undiscovered) {
            return Err(ScormError::AlreadyConfigured);
        }
        self.config = config;
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Whether an API (real or no-op) is available. Triggers discovery.
    pub fn api_found(&mut self) -> bool {
        self.api().is_some()
    }

    /// Protocol generation of the discovered API. Triggers discovery.
    pub fn version(&mut self) -> Option<ScormVersion> {
        self.api().map(|api| api.version())
    }

    /// Last error reported by the API, if one is available.
    pub fn last_error(&mut self) -> Option<LastError> {
        self.api().map(|api| api.last_error())
    }

    /// Open the connection.
    ///
    /// Succeeds only when the call returns `"true"` and the last error is `0`.
    ///
    /// # Errors
    ///
    /// `AlreadyActive` or `Terminated` for lifecycle misuse, `ApiNotFound`
    /// when discovery failed, and `CallFailed` / `InconsistentSuccess` when
    /// the host rejects the call.
    pub fn initialize(&mut self) -> Result<(), ScormError> {
        match self.state {
            SessionState::Active => {
                chatter!(self, "initialize aborted: connection already active");
                return Err(ScormError::AlreadyActive);
            }
            SessionState::Terminated => {
                warn!("initialize aborted: connection was terminated");
                return Err(ScormError::Terminated);
            }
            SessionState::Uninitialized => {}
        }

        let api = self.require_api()?;
        let call = api.call_name(ProtocolCall::Initialize);
        if !is_true(&api.initialize()) {
            return Err(self.call_failed(&api, call));
        }

        let last = api.last_error();
        if !last.is_ok() {
            warn!(
                call,
                code = %last.code,
                message = %last.message,
                "initialize returned true with an error set"
            );
            return Err(ScormError::InconsistentSuccess {
                call,
                code: last.code,
                message: last.message,
            });
        }

        self.state = SessionState::Active;
        chatter!(self, version = %api.version(), "connection initialized");
        Ok(())
    }

    /// Close the connection.
    ///
    /// Before the underlying call, applies the automatic completion status and
    /// exit mode when the matching config flags are on.
    ///
    /// # Errors
    ///
    /// `NotActive` unless the session is active, `CallFailed` when the host
    /// rejects the call.
    pub fn terminate(&mut self) -> Result<(), ScormError> {
        let api = self.require_active("terminate")?;

        if self.config.handle_completion_status && !self.completion_explicit {
            self.apply_default_status();
        }
        if self.config.handle_exit_mode && self.exit_mode.is_none() {
            self.apply_default_exit();
        }

        let call = api.call_name(ProtocolCall::Terminate);
        if !is_true(&api.terminate()) {
            return Err(self.call_failed(&api, call));
        }

        self.state = SessionState::Terminated;
        chatter!(self, "connection terminated");
        Ok(())
    }

    /// Read a data-model element.
    ///
    /// # Errors
    ///
    /// `NotActive` unless the session is active, `CallFailed` when the last
    /// error after the read is non-zero.
    pub fn get(&mut self, key: &str) -> Result<String, ScormError> {
        let api = self.require_active("get")?;
        let value = api.get_value(key);
        let last = api.last_error();
        if !last.is_ok() {
            return Err(self.call_failed_with(&api, api.call_name(ProtocolCall::GetValue), last));
        }

        match CmiElement::mirrored(key) {
            Some(CmiElement::CompletionStatus) => self.completion_status = value.parse().ok(),
            Some(CmiElement::Exit) if !value.is_empty() => {
                if let Ok(mode) = ExitMode::parse_cmi(&value) {
                    self.exit_mode = Some(mode);
                }
            }
            _ => {}
        }
        chatter!(self, key, value = %value, "get");
        Ok(value)
    }

    /// Write a data-model element.
    ///
    /// Successful writes to the completion-status or exit keys update the
    /// local mirror; failed writes leave it untouched.
    ///
    /// # Errors
    ///
    /// `NotActive` unless the session is active, `CallFailed` when the call
    /// does not return `"true"` or the last error is non-zero.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ScormError> {
        let api = self.require_active("set")?;
        let result = api.set_value(key, value);
        let last = api.last_error();
        if !is_true(&result) || !last.is_ok() {
            return Err(self.call_failed_with(&api, api.call_name(ProtocolCall::SetValue), last));
        }

        match CmiElement::mirrored(key) {
            Some(CmiElement::CompletionStatus) => {
                self.completion_status = value.parse().ok();
                self.completion_explicit = true;
            }
            Some(CmiElement::Exit) => self.exit_mode = ExitMode::parse_cmi(value).ok(),
            _ => {}
        }
        chatter!(self, key, value, "set");
        Ok(())
    }

    /// Read an element by its logical name in the discovered version.
    ///
    /// # Errors
    ///
    /// As [`ScormSession::get`].
    pub fn get_element(&mut self, element: CmiElement) -> Result<String, ScormError> {
        let version = self.require_active("get")?.version();
        self.get(element.key(version))
    }

    /// Write an element by its logical name in the discovered version.
    ///
    /// # Errors
    ///
    /// As [`ScormSession::set`].
    pub fn set_element(&mut self, element: CmiElement, value: &str) -> Result<(), ScormError> {
        let version = self.require_active("set")?.version();
        self.set(element.key(version), value)
    }

    /// Ask the host to persist pending data.
    ///
    /// # Errors
    ///
    /// `NotActive` unless the session is active, `CallFailed` when the host
    /// rejects the commit.
    pub fn save(&mut self) -> Result<(), ScormError> {
        let api = self.require_active("save")?;
        let result = api.commit();
        let last = api.last_error();
        if !is_true(&result) || !last.is_ok() {
            return Err(self.call_failed_with(&api, api.call_name(ProtocolCall::Commit), last));
        }
        chatter!(self, "committed");
        Ok(())
    }

    /// Current completion status as reported by the host.
    ///
    /// `Ok(None)` when the host returns an empty or unrecognized value.
    ///
    /// # Errors
    ///
    /// As [`ScormSession::get`].
    pub fn status(&mut self) -> Result<Option<CompletionStatus>, ScormError> {
        let raw = self.get_element(CmiElement::CompletionStatus)?;
        Ok(raw.parse().ok())
    }

    /// # Errors
    ///
    /// As [`ScormSession::set`].
    pub fn set_status(&mut self, status: CompletionStatus) -> Result<(), ScormError> {
        self.set_element(CmiElement::CompletionStatus, status.as_str())
    }

    /// Exit mode as reported by the host. The element is write-only in both
    /// versions, so most hosts answer with an error.
    ///
    /// # Errors
    ///
    /// As [`ScormSession::get`].
    pub fn exit_mode(&mut self) -> Result<Option<ExitMode>, ScormError> {
        let raw = self.get_element(CmiElement::Exit)?;
        Ok(ExitMode::parse_cmi(&raw).ok())
    }

    /// # Errors
    ///
    /// As [`ScormSession::set`].
    pub fn set_exit_mode(&mut self, mode: ExitMode) -> Result<(), ScormError> {
        let version = self.require_active("set")?.version();
        self.set_element(CmiElement::Exit, mode.as_cmi(version))
    }

    /// Last completion status seen in a read or successful write.
    #[must_use]
    pub fn cached_status(&self) -> Option<CompletionStatus> {
        self.completion_status
    }

    /// Last exit mode successfully written, or reported by the host.
    #[must_use]
    pub fn cached_exit_mode(&self) -> Option<ExitMode> {
        self.exit_mode
    }

    fn apply_default_status(&mut self) {
        let current = match self.status() {
            Ok(status) => status,
            Err(err) => {
                warn!(%err, "could not read completion status before terminate");
                return;
            }
        };
        if matches!(
            current,
            None | Some(CompletionStatus::NotAttempted | CompletionStatus::Unknown)
        ) {
            chatter!(self, "setting completion status to incomplete before terminate");
            if let Err(err) = self.set_status(CompletionStatus::Incomplete) {
                warn!(%err, "could not set default completion status");
            }
        }
    }

    fn apply_default_exit(&mut self) {
        let finished = self.completion_status.is_some_and(CompletionStatus::is_finished);
        let mode = if finished {
            ExitMode::Logout
        } else {
            ExitMode::Suspend
        };
        chatter!(self, ?mode, "setting exit mode before terminate");
        if let Err(err) = self.set_exit_mode(mode) {
            warn!(%err, "could not set default exit mode");
        }
    }

    fn api(&mut self) -> Option<ApiHandle> {
        if matches!(self.slot, ApiSlot::Undiscovered) {
            self.slot = self.locate_api();
        }
        match &self.slot {
            ApiSlot::Found(api) => Some(api.clone()),
            ApiSlot::Missing | ApiSlot::Undiscovered => None,
        }
    }

    fn locate_api(&self) -> ApiSlot {
        if let Some(found) = discover(self.host.as_ref(), self.config.find_attempt_limit) {
            chatter!(
                self,
                version = %found.handle.version(),
                hops = found.hops,
                via_opener = found.via_opener,
                "SCORM API found"
            );
            return ApiSlot::Found(found.handle);
        }

        if self.config.strict_find_api {
            warn!("SCORM API not found and strict lookup is on");
            ApiSlot::Missing
        } else {
            chatter!(self, "SCORM API not found, using no-op API");
            ApiSlot::Found(ApiHandle::V12(Arc::new(NoOpApi)))
        }
    }

    fn require_api(&mut self) -> Result<ApiHandle, ScormError> {
        self.api().ok_or_else(|| {
            warn!("SCORM API not available");
            ScormError::ApiNotFound
        })
    }

    fn require_active(&mut self, operation: &'static str) -> Result<ApiHandle, ScormError> {
        if !self.is_active() {
            chatter!(self, operation, state = ?self.state, "connection not active");
            return Err(ScormError::NotActive);
        }
        self.require_api()
    }

    fn call_failed(&self, api: &ApiHandle, call: &'static str) -> ScormError {
        self.call_failed_with(api, call, api.last_error())
    }

    fn call_failed_with(&self, api: &ApiHandle, call: &'static str, last: LastError) -> ScormError {
        let diagnostic = api.diagnostic(&last.code);
        warn!(
            call,
            code = %last.code,
            message = %last.message,
            diagnostic = %diagnostic,
            "SCORM call failed"
        );
        ScormError::CallFailed {
            call,
            code: last.code,
            message: last.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use selector_core::scorm::{Scorm12Api, Scorm2004Api};

    use super::*;
    use crate::scorm::frames::FrameTree;

    /// Scripted 2004 API that records every call.
    #[derive(Default)]
    struct ScriptedApi {
        values: Mutex<HashMap<String, String>>,
        calls: Mutex<Vec<String>>,
        fail_set_for: Mutex<Option<String>>,
        unreadable: Mutex<Option<String>>,
        init_result: Mutex<Option<String>>,
        error_after_init: Mutex<Option<String>>,
        last_error: Mutex<String>,
    }

    impl ScriptedApi {
        fn with_value(self, key: &str, value: &str) -> Self {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_owned(), value.to_owned());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn value(&self, key: &str) -> Option<String> {
            self.values.lock().unwrap().get(key).cloned()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn set_error(&self, code: &str) {
            *self.last_error.lock().unwrap() = code.to_owned();
        }
    }

    impl Scorm2004Api for ScriptedApi {
        fn initialize(&self, _: &str) -> String {
            self.record("Initialize".into());
            let code = self.error_after_init.lock().unwrap().clone();
            self.set_error(code.as_deref().unwrap_or("0"));
            self.init_result
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| "true".into())
        }
        fn terminate(&self, _: &str) -> String {
            self.record("Terminate".into());
            self.set_error("0");
            "true".into()
        }
        fn get_value(&self, key: &str) -> String {
            self.record(format!("GetValue({key})"));
            if self.unreadable.lock().unwrap().as_deref() == Some(key) {
                self.set_error("405");
                return String::new();
            }
            self.set_error("0");
            self.value(key).unwrap_or_default()
        }
        fn set_value(&self, key: &str, value: &str) -> String {
            self.record(format!("SetValue({key},{value})"));
            if self.fail_set_for.lock().unwrap().as_deref() == Some(key) {
                self.set_error("351");
                return "false".into();
            }
            self.set_error("0");
            self.values
                .lock()
                .unwrap()
                .insert(key.to_owned(), value.to_owned());
            "true".into()
        }
        fn commit(&self, _: &str) -> String {
            self.record("Commit".into());
            self.set_error("0");
            "true".into()
        }
        fn get_last_error(&self) -> String {
            self.last_error.lock().unwrap().clone()
        }
        fn get_error_string(&self, code: &str) -> String {
            format!("error {code}")
        }
        fn get_diagnostic(&self, _: &str) -> String {
            String::new()
        }
    }

    fn session_2004(api: Arc<ScriptedApi>, config: ScormConfig) -> ScormSession {
        let mut tree = FrameTree::new();
        let top = tree.top();
        tree.bind_2004(top, api);
        let content = tree.add_child(top);
        tree.set_current(content);
        ScormSession::new(Arc::new(tree), config)
    }

    fn empty_host() -> Arc<dyn FrameHost> {
        Arc::new(FrameTree::new())
    }

    #[test]
    fn operations_before_initialize_are_not_active() {
        let api = Arc::new(ScriptedApi::default());
        let mut session = session_2004(Arc::clone(&api), ScormConfig::default());
        assert_eq!(session.get("cmi.suspend_data"), Err(ScormError::NotActive));
        assert_eq!(session.set("cmi.suspend_data", "{}"), Err(ScormError::NotActive));
        assert_eq!(session.save(), Err(ScormError::NotActive));
        assert_eq!(session.terminate(), Err(ScormError::NotActive));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn initialize_twice_is_rejected_without_host_call() {
        let api = Arc::new(ScriptedApi::default());
        let mut session = session_2004(Arc::clone(&api), ScormConfig::default());
        session.initialize().unwrap();
        assert_eq!(session.initialize(), Err(ScormError::AlreadyActive));
        assert_eq!(api.calls(), ["Initialize"]);
    }

    #[test]
    fn initialize_requires_zero_last_error() {
        let api = Arc::new(ScriptedApi::default());
        *api.error_after_init.lock().unwrap() = Some("101".into());
        let mut session = session_2004(Arc::clone(&api), ScormConfig::default());
        assert!(matches!(
            session.initialize(),
            Err(ScormError::InconsistentSuccess { code, .. }) if code == "101"
        ));
        assert!(!session.is_active());
    }

    #[test]
    fn initialize_false_is_call_failed() {
        let api = Arc::new(ScriptedApi::default());
        *api.init_result.lock().unwrap() = Some("false".into());
        *api.error_after_init.lock().unwrap() = Some("102".into());
        let mut session = session_2004(Arc::clone(&api), ScormConfig::default());
        assert!(matches!(
            session.initialize(),
            Err(ScormError::CallFailed { call: "Initialize", .. })
        ));
        assert_eq!(session.state(), SessionState::Uninitialized);
    }

    #[test]
    fn terminated_session_cannot_restart() {
        let api = Arc::new(ScriptedApi::default());
        let mut session = session_2004(Arc::clone(&api), ScormConfig::default());
        session.initialize().unwrap();
        session.terminate().unwrap();
        assert_eq!(session.initialize(), Err(ScormError::Terminated));
        assert_eq!(session.get("cmi.suspend_data"), Err(ScormError::NotActive));
    }

    #[test]
    fn terminate_twice_is_not_active() {
        let api = Arc::new(ScriptedApi::default());
        let mut session = session_2004(Arc::clone(&api), ScormConfig::default());
        session.initialize().unwrap();
        assert_eq!(session.terminate(), Ok(()));
        let calls = api.calls().len();
        assert_eq!(session.terminate(), Err(ScormError::NotActive));
        assert_eq!(session.state(), SessionState::Terminated);
        assert_eq!(api.calls().len(), calls);
    }

    #[test]
    fn get_with_nonzero_last_error_reads_as_empty() {
        let api = Arc::new(ScriptedApi::default().with_value("cmi.exit", "suspend"));
        *api.unreadable.lock().unwrap() = Some("cmi.exit".into());
        let mut session = session_2004(Arc::clone(&api), ScormConfig::default());
        session.initialize().unwrap();

        let read = session.get("cmi.exit");
        assert!(matches!(
            &read,
            Err(ScormError::CallFailed { call: "GetValue", code, .. }) if code == "405"
        ));
        assert_eq!(read.unwrap_or_default(), "");
        assert_eq!(session.cached_exit_mode(), None);
    }

    #[test]
    fn exit_read_from_host_is_kept_at_terminate() {
        let api = Arc::new(ScriptedApi::default().with_value("cmi.exit", "logout"));
        let mut session = session_2004(Arc::clone(&api), ScormConfig::default());
        session.initialize().unwrap();

        assert_eq!(session.exit_mode(), Ok(Some(ExitMode::Logout)));
        assert_eq!(session.cached_exit_mode(), Some(ExitMode::Logout));

        session.terminate().unwrap();
        assert_eq!(api.value("cmi.exit").as_deref(), Some("logout"));
        assert!(!api.calls().iter().any(|call| call.starts_with("SetValue(cmi.exit")));
    }

    #[test]
    fn terminate_defaults_status_and_exit() {
        let api = Arc::new(
            ScriptedApi::default().with_value("cmi.completion_status", "not attempted"),
        );
        let mut session = session_2004(Arc::clone(&api), ScormConfig::default());
        session.initialize().unwrap();
        session.terminate().unwrap();

        assert_eq!(api.value("cmi.completion_status").as_deref(), Some("incomplete"));
        assert_eq!(api.value("cmi.exit").as_deref(), Some("suspend"));
        assert_eq!(api.calls().last().map(String::as_str), Some("Terminate"));
    }

    #[test]
    fn finished_status_exits_with_logout() {
        let api = Arc::new(ScriptedApi::default());
        let mut session = session_2004(Arc::clone(&api), ScormConfig::default());
        session.initialize().unwrap();
        session.set_status(CompletionStatus::Completed).unwrap();
        session.terminate().unwrap();

        assert_eq!(api.value("cmi.completion_status").as_deref(), Some("completed"));
        assert_eq!(api.value("cmi.exit").as_deref(), Some("logout"));
    }

    #[test]
    fn explicit_exit_is_not_overridden() {
        let api = Arc::new(ScriptedApi::default());
        let mut session = session_2004(Arc::clone(&api), ScormConfig::default());
        session.initialize().unwrap();
        session.set_exit_mode(ExitMode::Normal).unwrap();
        session.terminate().unwrap();
        assert_eq!(api.value("cmi.exit").as_deref(), Some("normal"));
    }

    #[test]
    fn disabled_handling_leaves_values_alone() {
        let api = Arc::new(
            ScriptedApi::default().with_value("cmi.completion_status", "not attempted"),
        );
        let config = ScormConfig::default()
            .with_completion_status_handling(false)
            .with_exit_mode_handling(false);
        let mut session = session_2004(Arc::clone(&api), config);
        session.initialize().unwrap();
        session.terminate().unwrap();

        assert_eq!(api.value("cmi.completion_status").as_deref(), Some("not attempted"));
        assert_eq!(api.value("cmi.exit"), None);
        assert_eq!(api.calls(), ["Initialize", "Terminate"]);
    }

    #[test]
    fn failed_set_does_not_touch_mirror() {
        let api = Arc::new(ScriptedApi::default());
        *api.fail_set_for.lock().unwrap() = Some("cmi.completion_status".into());
        let mut session = session_2004(Arc::clone(&api), ScormConfig::default());
        session.initialize().unwrap();

        assert!(matches!(
            session.set_status(CompletionStatus::Completed),
            Err(ScormError::CallFailed { call: "SetValue", .. })
        ));
        assert_eq!(session.cached_status(), None);
    }

    #[test]
    fn successful_set_updates_mirror() {
        let api = Arc::new(ScriptedApi::default());
        let mut session = session_2004(Arc::clone(&api), ScormConfig::default());
        session.initialize().unwrap();
        session.set("cmi.completion_status", "incomplete").unwrap();
        session.set("cmi.exit", "suspend").unwrap();
        assert_eq!(session.cached_status(), Some(CompletionStatus::Incomplete));
        assert_eq!(session.cached_exit_mode(), Some(ExitMode::Suspend));
    }

    #[test]
    fn lenient_lookup_substitutes_noop_api() {
        let mut session = ScormSession::new(empty_host(), ScormConfig::default());
        session.initialize().unwrap();
        assert_eq!(session.version(), Some(ScormVersion::Scorm12));
        assert_eq!(session.get("cmi.suspend_data").unwrap(), "");
        session.set("cmi.suspend_data", "{}").unwrap();
        session.save().unwrap();
        session.terminate().unwrap();
    }

    #[test]
    fn strict_lookup_miss_is_cached() {
        let config = ScormConfig::default().with_strict_find_api(true);
        let mut session = ScormSession::new(empty_host(), config);
        assert_eq!(session.initialize(), Err(ScormError::ApiNotFound));
        assert!(!session.api_found());
        assert_eq!(session.configure(ScormConfig::default()), Err(ScormError::AlreadyConfigured));
        assert_eq!(session.initialize(), Err(ScormError::ApiNotFound));
    }

    #[test]
    fn configure_before_discovery_is_accepted() {
        let mut session = ScormSession::new(empty_host(), ScormConfig::default());
        session
            .configure(ScormConfig::default().with_strict_find_api(true))
            .unwrap();
        assert_eq!(session.initialize(), Err(ScormError::ApiNotFound));
    }

    #[test]
    fn session_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ScormSession>();
        fn assert_api<T: Scorm12Api>() {}
        assert_api::<NoOpApi>();
    }
}
