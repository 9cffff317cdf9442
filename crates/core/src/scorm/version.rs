use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The two SCORM run-time API generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScormVersion {
    /// SCORM 1.2, exposed by the LMS as `window.API`.
    #[serde(rename = "1.2")]
    Scorm12,
    /// SCORM 2004, exposed by the LMS as `window.API_1484_11`.
    #[serde(rename = "2004")]
    Scorm2004,
}

/// Protocol operations shared by both versions under different names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolCall {
    Initialize,
    Terminate,
    GetValue,
    SetValue,
    Commit,
    GetLastError,
    GetErrorString,
    GetDiagnostic,
}

impl ScormVersion {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scorm12 => "1.2",
            Self::Scorm2004 => "2004",
        }
    }

    /// Name of the host object's method for `call` in this version.
    #[must_use]
    pub fn call_name(self, call: ProtocolCall) -> &'static str {
        match (self, call) {
            (Self::Scorm12, ProtocolCall::Initialize) => "LMSInitialize",
            (Self::Scorm12, ProtocolCall::Terminate) => "LMSFinish",
            (Self::Scorm12, ProtocolCall::GetValue) => "LMSGetValue",
            (Self::Scorm12, ProtocolCall::SetValue) => "LMSSetValue",
            (Self::Scorm12, ProtocolCall::Commit) => "LMSCommit",
            (Self::Scorm12, ProtocolCall::GetLastError) => "LMSGetLastError",
            (Self::Scorm12, ProtocolCall::GetErrorString) => "LMSGetErrorString",
            (Self::Scorm12, ProtocolCall::GetDiagnostic) => "LMSGetDiagnostic",
            (Self::Scorm2004, ProtocolCall::Initialize) => "Initialize",
            (Self::Scorm2004, ProtocolCall::Terminate) => "Terminate",
            (Self::Scorm2004, ProtocolCall::GetValue) => "GetValue",
            (Self::Scorm2004, ProtocolCall::SetValue) => "SetValue",
            (Self::Scorm2004, ProtocolCall::Commit) => "Commit",
            (Self::Scorm2004, ProtocolCall::GetLastError) => "GetLastError",
            (Self::Scorm2004, ProtocolCall::GetErrorString) => "GetErrorString",
            (Self::Scorm2004, ProtocolCall::GetDiagnostic) => "GetDiagnostic",
        }
    }

    /// Name of the window property the LMS binds its API object to.
    #[must_use]
    pub fn binding_name(self) -> &'static str {
        match self {
            Self::Scorm12 => "API",
            Self::Scorm2004 => "API_1484_11",
        }
    }

    /// Maximum `suspend_data` length the standard guarantees.
    #[must_use]
    pub fn suspend_data_limit(self) -> usize {
        match self {
            Self::Scorm12 => 4_096,
            Self::Scorm2004 => 64_000,
        }
    }
}

impl fmt::Display for ScormVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown SCORM version: {0} (expected 1.2 or 2004)")]
pub struct ParseVersionError(String);

impl FromStr for ScormVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1.2" | "12" => Ok(Self::Scorm12),
            "2004" => Ok(Self::Scorm2004),
            other => Err(ParseVersionError(other.to_owned())),
        }
    }
}
