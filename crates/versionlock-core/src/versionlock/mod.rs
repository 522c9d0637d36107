//! Versionlock configuration
//!
//! A versionlock file pins packages to permitted versions:
//!
//! ```toml
//! version = "1.0"
//!
//! [[packages]]
//! name = "kernel"
//!
//!   [[packages.conditions]]
//!   key = "version"
//!   comparator = "<"
//!   value = "6.9"
//! ```
//!
//! Files that are missing, unversioned or carry an unsupported version are
//! treated as empty. Entries with invalid content are still loaded and
//! report their problems through `is_valid()` and `errors()`.

pub mod comparator;
pub mod condition;
pub mod package;
pub mod parser;
pub mod schema;
pub mod store;

pub use comparator::{UnknownComparator, lookup_comparator};
pub use condition::{Condition, ConditionKey, UnknownConditionKey};
pub use package::Package;
pub use parser::{CONFIG_FILE_VERSION, parse_versionlock_toml, parse_versionlock_toml_str, to_toml};
pub use schema::{ConditionEntry, PackageEntry, VersionlockDocument};
pub use store::{Diagnostic, VersionlockConfig};
