use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::scorm::version::ScormVersion;

/// Data-model elements this package reads or writes.
///
/// Key strings are fixed by the standard; the same logical element has a
/// different key in each version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmiElement {
    SuspendData,
    CompletionStatus,
    Exit,
    Entry,
    LessonLocation,
    ScoreRaw,
    SessionTime,
    LearnerId,
    LearnerName,
}

/// Whether the content may read and/or write an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementAccess {
    ReadWrite,
    ReadOnly,
    WriteOnly,
}

impl CmiElement {
    pub const ALL: [CmiElement; 9] = [
        CmiElement::SuspendData,
        CmiElement::CompletionStatus,
        CmiElement::Exit,
        CmiElement::Entry,
        CmiElement::LessonLocation,
        CmiElement::ScoreRaw,
        CmiElement::SessionTime,
        CmiElement::LearnerId,
        CmiElement::LearnerName,
    ];

    #[must_use]
    pub fn key(self, version: ScormVersion) -> &'static str {
        match version {
            ScormVersion::Scorm12 => match self {
                Self::SuspendData => "cmi.suspend_data",
                Self::CompletionStatus => "cmi.core.lesson_status",
                Self::Exit => "cmi.core.exit",
                Self::Entry => "cmi.core.entry",
                Self::LessonLocation => "cmi.core.lesson_location",
                Self::ScoreRaw => "cmi.core.score.raw",
                Self::SessionTime => "cmi.core.session_time",
                Self::LearnerId => "cmi.core.student_id",
                Self::LearnerName => "cmi.core.student_name",
            },
            ScormVersion::Scorm2004 => match self {
                Self::SuspendData => "cmi.suspend_data",
                Self::CompletionStatus => "cmi.completion_status",
                Self::Exit => "cmi.exit",
                Self::Entry => "cmi.entry",
                Self::LessonLocation => "cmi.location",
                Self::ScoreRaw => "cmi.score.raw",
                Self::SessionTime => "cmi.session_time",
                Self::LearnerId => "cmi.learner_id",
                Self::LearnerName => "cmi.learner_name",
            },
        }
    }

    /// Resolve a key string for the given version.
    #[must_use]
    pub fn from_key(version: ScormVersion, key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|element| element.key(version) == key)
    }

    #[must_use]
    pub fn access(self) -> ElementAccess {
        match self {
            Self::Entry | Self::LearnerId | Self::LearnerName => ElementAccess::ReadOnly,
            Self::Exit | Self::SessionTime => ElementAccess::WriteOnly,
            Self::SuspendData | Self::CompletionStatus | Self::LessonLocation | Self::ScoreRaw => {
                ElementAccess::ReadWrite
            }
        }
    }

    /// Elements whose successful writes the session mirrors locally.
    ///
    /// Matches either version's key so a raw `set` with the "other" spelling
    /// still updates the mirror.
    #[must_use]
    pub fn mirrored(key: &str) -> Option<Self> {
        match key {
            "cmi.core.lesson_status" | "cmi.completion_status" => Some(Self::CompletionStatus),
            "cmi.core.exit" | "cmi.exit" => Some(Self::Exit),
            _ => None,
        }
    }
}

//
// ─── COMPLETION STATUS ─────────────────────────────────────────────────────────
//

/// Union of the 1.2 `lesson_status` and 2004 `completion_status` vocabularies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionStatus {
    Passed,
    Completed,
    Failed,
    Incomplete,
    Browsed,
    NotAttempted,
    Unknown,
}

impl CompletionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Incomplete => "incomplete",
            Self::Browsed => "browsed",
            Self::NotAttempted => "not attempted",
            Self::Unknown => "unknown",
        }
    }

    /// `completed` or `passed`.
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Passed)
    }

    #[must_use]
    pub fn is_valid_for(self, version: ScormVersion) -> bool {
        match version {
            ScormVersion::Scorm12 => !matches!(self, Self::Unknown),
            ScormVersion::Scorm2004 => matches!(
                self,
                Self::Completed | Self::Incomplete | Self::NotAttempted | Self::Unknown
            ),
        }
    }
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("'{value}' is not a valid {element} value")]
pub struct ParseVocabularyError {
    element: &'static str,
    value: String,
}

impl FromStr for CompletionStatus {
    type Err = ParseVocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "passed" => Ok(Self::Passed),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "incomplete" => Ok(Self::Incomplete),
            "browsed" => Ok(Self::Browsed),
            "not attempted" => Ok(Self::NotAttempted),
            "unknown" => Ok(Self::Unknown),
            other => Err(ParseVocabularyError {
                element: "completion status",
                value: other.to_owned(),
            }),
        }
    }
}

//
// ─── EXIT MODE ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitMode {
    Suspend,
    Logout,
    TimeOut,
    /// Ordinary exit: `""` in 1.2, `"normal"` in 2004.
    Normal,
}

impl ExitMode {
    #[must_use]
    pub fn as_cmi(self, version: ScormVersion) -> &'static str {
        match (self, version) {
            (Self::Suspend, _) => "suspend",
            (Self::Logout, _) => "logout",
            (Self::TimeOut, _) => "time-out",
            (Self::Normal, ScormVersion::Scorm12) => "",
            (Self::Normal, ScormVersion::Scorm2004) => "normal",
        }
    }

    /// Parse either version's spelling; `""` and `"normal"` are both `Normal`.
    ///
    /// # Errors
    ///
    /// Returns `ParseVocabularyError` for values outside the vocabulary.
    pub fn parse_cmi(raw: &str) -> Result<Self, ParseVocabularyError> {
        match raw.trim() {
            "suspend" => Ok(Self::Suspend),
            "logout" => Ok(Self::Logout),
            "time-out" => Ok(Self::TimeOut),
            "" | "normal" => Ok(Self::Normal),
            other => Err(ParseVocabularyError {
                element: "exit mode",
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_differ_by_version() {
        assert_eq!(
            CmiElement::CompletionStatus.key(ScormVersion::Scorm12),
            "cmi.core.lesson_status"
        );
        assert_eq!(
            CmiElement::CompletionStatus.key(ScormVersion::Scorm2004),
            "cmi.completion_status"
        );
        assert_eq!(
            CmiElement::SuspendData.key(ScormVersion::Scorm12),
            CmiElement::SuspendData.key(ScormVersion::Scorm2004)
        );
    }

    #[test]
    fn from_key_round_trips_every_element() {
        for version in [ScormVersion::Scorm12, ScormVersion::Scorm2004] {
            for element in CmiElement::ALL {
                assert_eq!(
                    CmiElement::from_key(version, element.key(version)),
                    Some(element)
                );
            }
        }
        assert_eq!(CmiElement::from_key(ScormVersion::Scorm12, "cmi.exit"), None);
    }

    #[test]
    fn mirrored_accepts_both_spellings() {
        assert_eq!(
            CmiElement::mirrored("cmi.exit"),
            Some(CmiElement::Exit)
        );
        assert_eq!(
            CmiElement::mirrored("cmi.core.lesson_status"),
            Some(CmiElement::CompletionStatus)
        );
        assert_eq!(CmiElement::mirrored("cmi.suspend_data"), None);
    }

    #[test]
    fn completion_vocabulary_depends_on_version() {
        assert!(CompletionStatus::Passed.is_valid_for(ScormVersion::Scorm12));
        assert!(!CompletionStatus::Passed.is_valid_for(ScormVersion::Scorm2004));
        assert!(!CompletionStatus::Unknown.is_valid_for(ScormVersion::Scorm12));
        assert_eq!(
            "not attempted".parse::<CompletionStatus>().unwrap(),
            CompletionStatus::NotAttempted
        );
        let err = "done".parse::<CompletionStatus>().unwrap_err();
        assert_eq!(err.to_string(), "'done' is not a valid completion status value");
    }

    #[test]
    fn normal_exit_spelling_depends_on_version() {
        assert_eq!(ExitMode::Normal.as_cmi(ScormVersion::Scorm12), "");
        assert_eq!(ExitMode::Normal.as_cmi(ScormVersion::Scorm2004), "normal");
        assert_eq!(ExitMode::parse_cmi("").unwrap(), ExitMode::Normal);
        assert_eq!(ExitMode::parse_cmi("suspend").unwrap(), ExitMode::Suspend);
        let err = ExitMode::parse_cmi("quit").unwrap_err();
        assert_eq!(err.to_string(), "'quit' is not a valid exit mode value");
    }
}
