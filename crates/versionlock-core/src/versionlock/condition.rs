//! A single versionlock condition: `key comparator value`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::comparator::lookup_comparator;
use super::schema::ConditionEntry;
use crate::types::QueryCmp;

/// Package attribute a condition constrains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKey {
    Epoch,
    Version,
    Evr,
    Arch,
}

impl ConditionKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionKey::Epoch => "epoch",
            ConditionKey::Version => "version",
            ConditionKey::Evr => "evr",
            ConditionKey::Arch => "arch",
        }
    }
}

impl fmt::Display for ConditionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition key text that does not name a known key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown condition key: '{0}'")]
pub struct UnknownConditionKey(pub String);

impl UnknownConditionKey {
    /// True when no key text was given at all.
    pub fn is_missing(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for ConditionKey {
    type Err = UnknownConditionKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "epoch" => Ok(ConditionKey::Epoch),
            "version" => Ok(ConditionKey::Version),
            "evr" => Ok(ConditionKey::Evr),
            "arch" => Ok(ConditionKey::Arch),
            _ => Err(UnknownConditionKey(s.to_string())),
        }
    }
}

/// A validated `(key, comparator, value)` triple.
///
/// Construction never fails. Problems with the input are recorded on the
/// condition itself and exposed through [`Condition::is_valid`] and
/// [`Condition::errors`], so invalid conditions can still be listed and
/// reported alongside valid ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ConditionEntry", into = "ConditionEntry")]
pub struct Condition {
    key: Option<ConditionKey>,
    key_str: String,
    comparator: Option<QueryCmp>,
    comparator_str: String,
    value: String,
    errors: Vec<String>,
}

impl Condition {
    /// Build a condition from raw text and validate it.
    pub fn new(
        key_str: impl Into<String>,
        comparator_str: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let mut condition = Self {
            key: None,
            key_str: key_str.into(),
            comparator: None,
            comparator_str: comparator_str.into(),
            value: value.into(),
            errors: Vec::new(),
        };
        condition.validate();
        condition
    }

    fn validate(&mut self) {
        match self.key_str.parse::<ConditionKey>() {
            Ok(key) => self.key = Some(key),
            Err(err) if err.is_missing() => self.errors.push("Missing condition key.".to_string()),
            Err(_) => self.errors.push("Invalid condition key.".to_string()),
        }

        match lookup_comparator(&self.comparator_str) {
            Ok(cmp) => self.comparator = Some(cmp),
            Err(err) if err.is_missing() => {
                self.errors.push("Missing condition comparator.".to_string())
            }
            Err(_) => self.errors.push("Invalid condition comparator.".to_string()),
        }

        if self.value.is_empty() {
            self.errors.push("Missing condition value.".to_string());
        }

        // Key specific rules only apply to an otherwise well-formed condition
        if !self.errors.is_empty() {
            return;
        }
        let (Some(key), Some(cmp)) = (self.key, self.comparator) else {
            return;
        };

        match key {
            ConditionKey::Epoch => {
                if self.value.parse::<u64>().is_err() {
                    self.errors
                        .push("Epoch condition needs to be an unsigned integer value.".to_string());
                }
            }
            ConditionKey::Arch => {
                if !cmp.is_equality() {
                    self.errors.push(
                        "Arch condition only supports '=' and '!=' comparison operators."
                            .to_string(),
                    );
                }
            }
            ConditionKey::Version | ConditionKey::Evr => {}
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Validation messages in the order the rules were checked
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Resolved key, `None` if the key text was not recognized
    pub fn key(&self) -> Option<ConditionKey> {
        self.key
    }

    /// Key text as it was read
    pub fn key_str(&self) -> &str {
        &self.key_str
    }

    /// Resolved comparator, `None` if the comparator text was not recognized
    pub fn comparator(&self) -> Option<QueryCmp> {
        self.comparator
    }

    /// Comparator text as it was read
    pub fn comparator_str(&self) -> &str {
        &self.comparator_str
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Format as `key comparator value`, regardless of validity.
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }

    /// Encode as a `[[packages.conditions]]` record, keeping the raw text
    pub fn to_record(&self) -> ConditionEntry {
        ConditionEntry {
            key: self.key_str.clone(),
            comparator: self.comparator_str.clone(),
            value: self.value.clone(),
        }
    }

    /// Decode from a record; missing or mistyped fields are already empty
    pub fn from_record(entry: ConditionEntry) -> Self {
        Self::new(entry.key, entry.comparator, entry.value)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.key_str, self.comparator_str, self.value)
    }
}
