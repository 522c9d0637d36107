//! A versionlock package entry.

use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::schema::PackageEntry;

/// A package name plus the conditions its versions must satisfy.
///
/// Conditions are ANDed and kept in insertion order. Validity of the entry
/// only covers the name; each condition carries its own validity, so
/// callers need to check both levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PackageEntry", into = "PackageEntry")]
pub struct Package {
    name: String,
    conditions: Vec<Condition>,
    errors: Vec<String>,
}

impl Package {
    /// Create a new package entry without conditions
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push("Missing package name.".to_string());
        }

        Self {
            name,
            conditions: Vec::new(),
            errors,
        }
    }

    /// Replace all conditions
    pub fn set_conditions(&mut self, conditions: Vec<Condition>) {
        self.conditions = conditions;
    }

    /// Replace all conditions, builder style
    pub fn with_conditions(mut self, conditions: Vec<Condition>) -> Self {
        self.set_conditions(conditions);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Owned copy of the conditions
    pub fn get_conditions(&self) -> Vec<Condition> {
        self.conditions.clone()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Encode as a `[[packages]]` record
    pub fn to_record(&self) -> PackageEntry {
        PackageEntry {
            name: self.name.clone(),
            conditions: self.conditions.iter().map(Condition::to_record).collect(),
        }
    }

    /// Decode from a record; missing or mistyped fields are already empty
    pub fn from_record(entry: PackageEntry) -> Self {
        let conditions = entry
            .conditions
            .into_iter()
            .map(Condition::from_record)
            .collect();
        Self::new(entry.name).with_conditions(conditions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_package_is_valid() {
        let package = Package::new("bash");
        assert!(package.is_valid());
        assert!(package.errors().is_empty());
        assert!(package.conditions().is_empty());
    }

    #[test]
    fn test_missing_name() {
        let package = Package::new("");
        assert!(!package.is_valid());
        assert_eq!(package.errors(), ["Missing package name."]);
    }

    #[test]
    fn test_set_conditions_replaces() {
        let mut package = Package::new("bash");
        package.set_conditions(vec![
            Condition::new("version", "=", "5.2"),
            Condition::new("arch", "=", "x86_64"),
        ]);
        assert_eq!(package.conditions().len(), 2);

        package.set_conditions(vec![Condition::new("epoch", "=", "0")]);
        assert_eq!(package.conditions().len(), 1);
        assert_eq!(package.conditions()[0].key_str(), "epoch");
    }

    #[test]
    fn test_validity_ignores_conditions() {
        let package = Package::new("bash").with_conditions(vec![
            Condition::new("", "", ""),
            Condition::new("arch", ">", "x86_64"),
        ]);

        assert!(package.is_valid());
        assert!(package.conditions().iter().all(|c| !c.is_valid()));
    }

    #[test]
    fn test_get_conditions_is_a_copy() {
        let package = Package::new("bash").with_conditions(vec![Condition::new("evr", ">", "1")]);
        let mut copy = package.get_conditions();
        copy.clear();
        assert_eq!(package.conditions().len(), 1);
    }
}
