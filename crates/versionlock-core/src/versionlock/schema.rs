//! Record types for the versionlock TOML file
//!
//! Every field defaults when missing or of the wrong type, so a record
//! always decodes and the content checks are left to [`Condition`] and
//! [`Package`].

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use super::condition::Condition;
use super::package::Package;

/// Root document written to a versionlock file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionlockDocument {
    /// File format version
    pub version: String,

    /// Locked packages, in file order
    #[serde(default, deserialize_with = "lenient_seq")]
    pub packages: Vec<PackageEntry>,
}

/// One `[[packages]]` record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_seq")]
    pub conditions: Vec<ConditionEntry>,
}

/// One `[[packages.conditions]]` record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConditionEntry {
    /// Raw key text: epoch, version, evr or arch
    #[serde(default, deserialize_with = "lenient")]
    pub key: String,

    /// Raw comparator text
    #[serde(default, deserialize_with = "lenient")]
    pub comparator: String,

    #[serde(default, deserialize_with = "lenient")]
    pub value: String,
}

/// A value of the expected type, or anything else
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Value(T),
    Other(IgnoredAny),
}

impl<T: Default> Lenient<T> {
    fn into_value(self) -> T {
        match self {
            Lenient::Value(value) => value,
            Lenient::Other(_) => T::default(),
        }
    }
}

/// Decode a field, falling back to its default on a type mismatch
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Lenient::<T>::deserialize(deserializer)?.into_value())
}

/// Decode a sequence of records. A non-sequence is empty and an element of
/// the wrong type becomes a default record, keeping its position.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let items = Lenient::<Vec<Lenient<T>>>::deserialize(deserializer)?.into_value();
    Ok(items.into_iter().map(Lenient::into_value).collect())
}

impl From<ConditionEntry> for Condition {
    fn from(entry: ConditionEntry) -> Self {
        Condition::from_record(entry)
    }
}

impl From<Condition> for ConditionEntry {
    fn from(condition: Condition) -> Self {
        condition.to_record()
    }
}

impl From<PackageEntry> for Package {
    fn from(entry: PackageEntry) -> Self {
        Package::from_record(entry)
    }
}

impl From<Package> for PackageEntry {
    fn from(package: Package) -> Self {
        package.to_record()
    }
}

impl VersionlockDocument {
    /// Build a document at the given format version from packages
    pub fn new(version: &str, packages: &[Package]) -> Self {
        Self {
            version: version.to_string(),
            packages: packages.iter().map(Package::to_record).collect(),
        }
    }
}
