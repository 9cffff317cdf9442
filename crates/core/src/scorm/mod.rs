//! SCORM run-time protocol surface shared by the session manager and the
//! local LMS.

pub mod api;
mod element;
mod version;

pub use api::{ApiHandle, LastError, Scorm12Api, Scorm2004Api, bool_str, codes, is_true};
pub use element::{CmiElement, CompletionStatus, ElementAccess, ExitMode, ParseVocabularyError};
pub use version::{ParseVersionError, ProtocolCall, ScormVersion};
