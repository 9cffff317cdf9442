//! Host API object contract.
//!
//! The LMS exposes an object whose methods take and return strings: booleans
//! come back as `"true"`/`"false"` and error codes as decimal strings. The two
//! generations use different method names, so each gets its own trait and
//! [`ApiHandle`] carries the discovered generation with the object.

use std::fmt;
use std::sync::Arc;

use crate::scorm::version::{ProtocolCall, ScormVersion};

/// SCORM 1.2 run-time API (`window.API`).
pub trait Scorm12Api: Send + Sync {
    fn lms_initialize(&self, arg: &str) -> String;
    fn lms_finish(&self, arg: &str) -> String;
    fn lms_get_value(&self, element: &str) -> String;
    fn lms_set_value(&self, element: &str, value: &str) -> String;
    fn lms_commit(&self, arg: &str) -> String;
    fn lms_get_last_error(&self) -> String;
    fn lms_get_error_string(&self, code: &str) -> String;
    fn lms_get_diagnostic(&self, code: &str) -> String;
}

/// SCORM 2004 run-time API (`window.API_1484_11`).
pub trait Scorm2004Api: Send + Sync {
    fn initialize(&self, arg: &str) -> String;
    fn terminate(&self, arg: &str) -> String;
    fn get_value(&self, element: &str) -> String;
    fn set_value(&self, element: &str, value: &str) -> String;
    fn commit(&self, arg: &str) -> String;
    fn get_last_error(&self) -> String;
    fn get_error_string(&self, code: &str) -> String;
    fn get_diagnostic(&self, code: &str) -> String;
}

/// A discovered host API object tagged with its protocol generation.
#[derive(Clone)]
pub enum ApiHandle {
    V12(Arc<dyn Scorm12Api>),
    V2004(Arc<dyn Scorm2004Api>),
}

impl fmt::Debug for ApiHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiHandle({})", self.version())
    }
}

impl ApiHandle {
    #[must_use]
    pub fn version(&self) -> ScormVersion {
        match self {
            Self::V12(_) => ScormVersion::Scorm12,
            Self::V2004(_) => ScormVersion::Scorm2004,
        }
    }

    #[must_use]
    pub fn call_name(&self, call: ProtocolCall) -> &'static str {
        self.version().call_name(call)
    }

    #[must_use]
    pub fn initialize(&self) -> String {
        match self {
            Self::V12(api) => api.lms_initialize(""),
            Self::V2004(api) => api.initialize(""),
        }
    }

    #[must_use]
    pub fn terminate(&self) -> String {
        match self {
            Self::V12(api) => api.lms_finish(""),
            Self::V2004(api) => api.terminate(""),
        }
    }

    #[must_use]
    pub fn get_value(&self, element: &str) -> String {
        match self {
            Self::V12(api) => api.lms_get_value(element),
            Self::V2004(api) => api.get_value(element),
        }
    }

    #[must_use]
    pub fn set_value(&self, element: &str, value: &str) -> String {
        match self {
            Self::V12(api) => api.lms_set_value(element, value),
            Self::V2004(api) => api.set_value(element, value),
        }
    }

    #[must_use]
    pub fn commit(&self) -> String {
        match self {
            Self::V12(api) => api.lms_commit(""),
            Self::V2004(api) => api.commit(""),
        }
    }

    #[must_use]
    pub fn diagnostic(&self, code: &str) -> String {
        match self {
            Self::V12(api) => api.lms_get_diagnostic(code),
            Self::V2004(api) => api.get_diagnostic(code),
        }
    }

    /// Read the last error code and its description.
    #[must_use]
    pub fn last_error(&self) -> LastError {
        let (code, message) = match self {
            Self::V12(api) => {
                let code = api.lms_get_last_error();
                let message = api.lms_get_error_string(&code);
                (code, message)
            }
            Self::V2004(api) => {
                let code = api.get_last_error();
                let message = api.get_error_string(&code);
                (code, message)
            }
        };
        LastError { code, message }
    }
}

/// SCORM booleans travel as the strings `"true"` and `"false"`.
#[must_use]
pub fn is_true(result: &str) -> bool {
    result.trim() == "true"
}

#[must_use]
pub fn bool_str(value: bool) -> String {
    if value { "true" } else { "false" }.to_owned()
}

/// Result of `GetLastError` + `GetErrorString`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastError {
    pub code: String,
    pub message: String,
}

impl LastError {
    #[must_use]
    pub fn none() -> Self {
        Self {
            code: codes::NO_ERROR.to_string(),
            message: "No error".to_owned(),
        }
    }

    /// Only the literal code `0` counts as success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code.trim() == "0"
    }
}

impl fmt::Display for LastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Standard run-time error codes used by this crate.
pub mod codes {
    pub const NO_ERROR: u16 = 0;
    pub const GENERAL_EXCEPTION: u16 = 101;
    /// 2004: `Initialize` after a successful `Initialize`.
    pub const ALREADY_INITIALIZED: u16 = 103;
    /// 2004: `Initialize` after `Terminate`.
    pub const CONTENT_INSTANCE_TERMINATED: u16 = 104;
    pub const TERMINATION_BEFORE_INIT: u16 = 112;
    pub const TERMINATION_AFTER_TERMINATION: u16 = 113;
    pub const RETRIEVE_BEFORE_INIT: u16 = 122;
    pub const RETRIEVE_AFTER_TERMINATION: u16 = 123;
    pub const STORE_BEFORE_INIT: u16 = 132;
    pub const STORE_AFTER_TERMINATION: u16 = 133;
    pub const COMMIT_BEFORE_INIT: u16 = 142;
    pub const COMMIT_AFTER_TERMINATION: u16 = 143;
    /// 1.2 "invalid argument" / 2004 "general argument error".
    pub const INVALID_ARGUMENT: u16 = 201;
    /// 1.2 "not initialized".
    pub const NOT_INITIALIZED_12: u16 = 301;
    /// 1.2 "not implemented" / 2004 "undefined data model element".
    pub const UNDEFINED_ELEMENT: u16 = 401;
    /// 1.2 "element is keyword" is 402; 2004 uses 403 for "value not initialized".
    pub const READ_ONLY_12: u16 = 403;
    pub const WRITE_ONLY_12: u16 = 404;
    pub const TYPE_MISMATCH_12: u16 = 405;
    pub const READ_ONLY_2004: u16 = 404;
    pub const WRITE_ONLY_2004: u16 = 405;
    pub const TYPE_MISMATCH_2004: u16 = 406;
    pub const OUT_OF_RANGE_2004: u16 = 407;
    pub const GENERAL_COMMIT_FAILURE_2004: u16 = 391;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_literal_true_is_success() {
        assert!(is_true("true"));
        assert!(!is_true("false"));
        assert!(!is_true("1"));
        assert!(!is_true(""));
    }

    #[test]
    fn last_error_zero_is_ok() {
        assert!(LastError::none().is_ok());
        let err = LastError {
            code: "301".to_owned(),
            message: "Not initialized".to_owned(),
        };
        assert!(!err.is_ok());
        assert_eq!(err.to_string(), "301: Not initialized");
        let blank = LastError {
            code: String::new(),
            message: String::new(),
        };
        assert!(!blank.is_ok());
    }
}
