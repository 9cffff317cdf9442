use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when an identifier is blank.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind} cannot be empty")]
pub struct IdError {
    kind: &'static str,
}

impl IdError {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, rejecting blank input.
            ///
            /// # Errors
            ///
            /// Returns `IdError` if the trimmed value is empty.
            pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(IdError {
                        kind: stringify!($name),
                    });
                }
                if trimmed.len() == value.len() {
                    Ok(Self(value))
                } else {
                    Ok(Self(trimmed.to_owned()))
                }
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Stable identifier of a competency category.
    CategoryId
);
string_id!(
    /// Stable identifier of a sub-competency.
    SubCompetencyId
);
string_id!(
    /// Stable identifier of an observable indicator (a leaf of the taxonomy).
    IndicatorId
);

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_id_display_is_raw_value() {
        let id = IndicatorId::new("ind-pd-di-1").unwrap();
        assert_eq!(id.to_string(), "ind-pd-di-1");
        assert_eq!(format!("{id:?}"), "IndicatorId(ind-pd-di-1)");
    }

    #[test]
    fn blank_ids_are_rejected() {
        let err = "   ".parse::<CategoryId>().unwrap_err();
        assert_eq!(err.kind(), "CategoryId");
        assert!(SubCompetencyId::new("").is_err());
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let id = IndicatorId::new("  ind-x ").unwrap();
        assert_eq!(id.as_str(), "ind-x");
    }

    #[test]
    fn serde_rejects_blank_ids() {
        let parsed: Result<IndicatorId, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());
        let parsed: IndicatorId = serde_json::from_str("\"ind-a\"").unwrap();
        assert_eq!(parsed.as_str(), "ind-a");
    }
}
