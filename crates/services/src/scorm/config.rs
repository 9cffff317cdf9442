use super::discovery::DEFAULT_FIND_ATTEMPT_LIMIT;

/// Behaviour switches for a [`ScormSession`](super::ScormSession).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScormConfig {
    /// Emit debug-level traces for every call. Failures are logged regardless.
    pub debug: bool,
    /// On terminate, move a never-set "not attempted"/"unknown" status to "incomplete".
    pub handle_completion_status: bool,
    /// On terminate, pick an exit mode when content never set one.
    pub handle_exit_mode: bool,
    /// Fail when no API is found instead of substituting [`NoOpApi`](super::NoOpApi).
    pub strict_find_api: bool,
    pub find_attempt_limit: usize,
}

impl Default for ScormConfig {
    fn default() -> Self {
        Self {
            debug: true,
            handle_completion_status: true,
            handle_exit_mode: true,
            strict_find_api: false,
            find_attempt_limit: DEFAULT_FIND_ATTEMPT_LIMIT,
        }
    }
}

impl ScormConfig {
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn with_completion_status_handling(mut self, enabled: bool) -> Self {
        self.handle_completion_status = enabled;
        self
    }

    #[must_use]
    pub fn with_exit_mode_handling(mut self, enabled: bool) -> Self {
        self.handle_exit_mode = enabled;
        self
    }

    #[must_use]
    pub fn with_strict_find_api(mut self, strict: bool) -> Self {
        self.strict_find_api = strict;
        self
    }

    #[must_use]
    pub fn with_find_attempt_limit(mut self, limit: usize) -> Self {
        self.find_attempt_limit = limit;
        self
    }
}
