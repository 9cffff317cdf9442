//! Codec between a [`SelectionMap`] and the SCORM suspend-data string.
//!
//! The wire shape is a JSON object keyed by indicator id, e.g.
//! `{"ind-a":true,"ind-c":true}`. Only selected ids are written; `false`
//! entries written by older packages are accepted and dropped on read.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::model::ids::IndicatorId;
use crate::model::selection::SelectionMap;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SuspendDataError {
    #[error("suspend data is not a JSON object of booleans: {0}")]
    Malformed(String),

    #[error("suspend data contains a blank indicator id")]
    BlankId,
}

impl SelectionMap {
    /// Serialize the selected ids into the suspend-data slot format.
    #[must_use]
    pub fn to_suspend_data(&self) -> String {
        let entries: BTreeMap<&str, bool> = self.iter().map(|id| (id.as_str(), true)).collect();
        // A map of &str -> bool cannot fail to serialize.
        serde_json::to_string(&entries).unwrap_or_else(|_| "{}".to_owned())
    }

    /// Parse a suspend-data string. Blank input is an empty selection.
    ///
    /// # Errors
    ///
    /// Returns `SuspendDataError::Malformed` when the input is not a JSON
    /// object with boolean values, and `BlankId` when a selected key is blank.
    pub fn parse_suspend_data(raw: &str) -> Result<Self, SuspendDataError> {
        if raw.trim().is_empty() {
            return Ok(Self::new());
        }

        let entries: BTreeMap<String, bool> = serde_json::from_str(raw)
            .map_err(|err| SuspendDataError::Malformed(err.to_string()))?;

        entries
            .into_iter()
            .filter(|(_, selected)| *selected)
            .map(|(key, _)| IndicatorId::new(key).map_err(|_| SuspendDataError::BlankId))
            .collect()
    }
}
