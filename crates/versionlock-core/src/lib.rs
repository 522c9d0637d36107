//! Versionlock Core Library
//!
//! Loads, validates and writes versionlock configuration: a list of
//! package names, each with an optional list of conditions that constrain
//! which versions of that package may be considered for installation.

pub mod types;
pub mod versionlock;

/// Re-exports of commonly used types
pub mod prelude {
    // Query operators
    pub use crate::types::QueryCmp;

    // Versionlock
    pub use crate::versionlock::{
        CONFIG_FILE_VERSION, Condition, ConditionKey, Diagnostic, Package, VersionlockConfig,
    };
}
