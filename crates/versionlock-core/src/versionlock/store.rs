//! Versionlock config for loading and saving versionlock files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use tracing::debug;

use super::{Package, parser};

/// A loaded versionlock file
#[derive(Debug, Clone)]
pub struct VersionlockConfig {
    path: PathBuf,
    packages: Vec<Package>,
}

/// One validation message for an entry in a versionlock file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Position of the package in the file
    pub package_index: usize,
    pub package_name: String,
    /// The offending condition, `None` for package level problems
    pub condition: Option<String>,
    pub message: String,
}

impl VersionlockConfig {
    /// Empty config bound to `path`, nothing is read
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            packages: Vec::new(),
        }
    }

    /// Load the versionlock file at `path`.
    ///
    /// A missing file gives an empty config. Unversioned files and files
    /// with an unsupported version are empty as well. Only unreadable files
    /// and malformed TOML are errors.
    pub fn load(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        if !path.exists() {
            debug!(path = %path.display(), "No versionlock file");
            return Ok(Self::new(path));
        }

        let packages = parser::parse_versionlock_toml(&path)?;
        Ok(Self { path, packages })
    }

    /// Build a config from in-memory TOML, `path` is kept for reference
    pub fn from_toml_str(path: impl Into<PathBuf>, content: &str) -> anyhow::Result<Self> {
        let packages = parser::parse_versionlock_toml_str(content)?;
        Ok(Self {
            path: path.into(),
            packages,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// Owned snapshot of the configured packages
    pub fn get_packages(&self) -> Vec<Package> {
        self.packages.clone()
    }

    pub fn set_packages(&mut self, packages: Vec<Package>) {
        self.packages = packages;
    }

    /// Append a package, keeping file order
    pub fn add_package(&mut self, package: Package) {
        self.packages.push(package);
    }

    /// Remove every package named `name`, returning how many were removed
    pub fn remove_packages(&mut self, name: &str) -> usize {
        let before = self.packages.len();
        self.packages.retain(|package| package.name() != name);
        before - self.packages.len()
    }

    /// Every validation message of every package and condition, in file order
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for (index, package) in self.packages.iter().enumerate() {
            for message in package.errors() {
                diagnostics.push(Diagnostic {
                    package_index: index,
                    package_name: package.name().to_string(),
                    condition: None,
                    message: message.clone(),
                });
            }

            for condition in package.conditions() {
                for message in condition.errors() {
                    diagnostics.push(Diagnostic {
                        package_index: index,
                        package_name: package.name().to_string(),
                        condition: Some(condition.to_string()),
                        message: message.clone(),
                    });
                }
            }
        }

        diagnostics
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        parser::to_toml(&self.packages)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let content = self
            .to_toml_string()
            .context("Failed to serialize versionlock file to TOML")?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!(
                    "Failed to create versionlock directory: {}",
                    parent.display()
                )
            })?;
        }
        std::fs::write(&self.path, content).with_context(|| {
            format!("Failed to write versionlock file: {}", self.path.display())
        })?;

        debug!(
            path = %self.path.display(),
            count = self.packages.len(),
            "Saved versionlock file"
        );
        Ok(())
    }
}
