//! TOML parser for versionlock files with helpful error messages

use super::package::Package;
use super::schema::VersionlockDocument;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, warn};

/// Supported versionlock file format version
pub const CONFIG_FILE_VERSION: &str = "1.0";

/// Parse a versionlock file with detailed error messages
///
/// Unversioned files and files with an unsupported version yield no
/// packages. Unreadable files and malformed TOML are errors.
pub fn parse_versionlock_toml(path: &Path) -> Result<Vec<Package>> {
    let _span = tracing::debug_span!("versionlock", path = %path.display()).entered();

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read versionlock file: {}", path.display()))?;

    parse_versionlock_toml_str(&content)
        .with_context(|| format!("Failed to parse versionlock file: {}", path.display()))
}

/// Parse versionlock content from string
pub fn parse_versionlock_toml_str(content: &str) -> Result<Vec<Package>> {
    let document: toml::Table =
        toml::from_str(content).map_err(|e| enhance_toml_error(e, content))?;

    let version = match document.get("version") {
        None => {
            warn!("Unversioned versionlock file, ignoring its packages");
            return Ok(Vec::new());
        }
        Some(toml::Value::String(version)) => version,
        Some(other) => anyhow::bail!(
            "Versionlock file version must be a string, found {}",
            other.type_str()
        ),
    };

    if version != CONFIG_FILE_VERSION {
        warn!(
            version = %version,
            supported = CONFIG_FILE_VERSION,
            "Unsupported versionlock file version, ignoring its packages"
        );
        return Ok(Vec::new());
    }

    let document: VersionlockDocument = toml::Value::Table(document)
        .try_into()
        .context("Invalid versionlock file")?;
    let packages: Vec<Package> = document
        .packages
        .into_iter()
        .map(Package::from_record)
        .collect();

    debug!(count = packages.len(), "Loaded versionlock packages");
    Ok(packages)
}

/// Enhance TOML parsing errors with helpful context
fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let error_msg = error.message().to_string();

    let line_hint = error
        .span()
        .map(|span| content[..span.start.min(content.len())].matches('\n').count() + 1);

    if let Some(line_num) = line_hint {
        let context = get_line_context(content, line_num);
        anyhow::anyhow!(
            "TOML parsing error at line {}:\n{}\n\nError: {}",
            line_num,
            context,
            error_msg
        )
    } else {
        anyhow::anyhow!("TOML parsing error: {}", error_msg)
    }
}

/// Get context lines around an error
fn get_line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2).min(lines.len());
    let end = (line_num + 1).min(lines.len());

    lines[start..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serialize packages to a versionlock TOML string
pub fn to_toml(packages: &[Package]) -> Result<String> {
    let document = VersionlockDocument::new(CONFIG_FILE_VERSION, packages);
    toml::to_string_pretty(&document)
        .with_context(|| "Failed to serialize versionlock packages to TOML")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::versionlock::Condition;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_valid_file() {
        let toml = r#"
version = "1.0"

[[packages]]
name = "kernel"

  [[packages.conditions]]
  key = "version"
  comparator = "<"
  value = "6.9"

  [[packages.conditions]]
  key = "arch"
  comparator = "="
  value = "x86_64"

[[packages]]
name = "bash"
"#;

        let packages = parse_versionlock_toml_str(toml).unwrap();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].name(), "kernel");
        assert_eq!(packages[0].conditions().len(), 2);
        assert_eq!(packages[0].conditions()[0].to_string(), "version < 6.9");
        assert_eq!(packages[1].name(), "bash");
        assert!(packages[1].conditions().is_empty());
    }

    #[test]
    fn test_parse_without_packages() {
        let packages = parse_versionlock_toml_str(r#"version = "1.0""#).unwrap();
        assert!(packages.is_empty());
    }

    #[test]
    fn test_unversioned_file_is_empty() {
        let toml = r#"
[[packages]]
name = "kernel"
"#;
        let packages = parse_versionlock_toml_str(toml).unwrap();
        assert!(packages.is_empty());
    }

    #[test]
    fn test_unsupported_version_is_empty() {
        let toml = r#"
version = "0.9"

[[packages]]
name = "kernel"
"#;
        let packages = parse_versionlock_toml_str(toml).unwrap();
        assert!(packages.is_empty());

        let packages = parse_versionlock_toml_str("version = \"1.0.0\"").unwrap();
        assert!(packages.is_empty());
    }

    #[test]
    fn test_non_string_version_is_error() {
        let result = parse_versionlock_toml_str("version = 1.0");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("must be a string"));
    }

    #[test]
    fn test_parse_invalid_toml() {
        let toml = r#"
version = "1.0"
[[packages]
name = "kernel"
"#; // Missing closing bracket

        let result = parse_versionlock_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_enhance_toml_error() {
        let toml = "version = \"1.0\"\ninvalid = [unclosed";
        let err = parse_versionlock_toml_str(toml).unwrap_err().to_string();

        assert!(err.contains("TOML parsing error"));
        assert!(err.contains(">>>"));
    }

    #[test]
    fn test_invalid_entries_still_loaded() {
        let toml = r#"
version = "1.0"

[[packages]]

  [[packages.conditions]]
  key = "epoch"
  comparator = "="
  value = "abc"
"#;

        let packages = parse_versionlock_toml_str(toml).unwrap();
        assert_eq!(packages.len(), 1);
        assert!(!packages[0].is_valid());
        assert!(!packages[0].conditions()[0].is_valid());
    }

    #[test]
    fn test_wrongly_typed_fields_keep_entries() {
        let toml = r#"
version = "1.0"

[[packages]]
name = "kernel"

  [[packages.conditions]]
  key = "epoch"
  comparator = "="
  value = 0

[[packages]]
name = "bash"
"#;

        let packages = parse_versionlock_toml_str(toml).unwrap();
        assert_eq!(packages.len(), 2);
        assert_eq!(
            packages[0].conditions()[0].errors(),
            ["Missing condition value."]
        );
        assert!(packages[1].is_valid());
    }

    #[test]
    fn test_non_array_packages_is_empty() {
        let packages = parse_versionlock_toml_str("version = \"1.0\"\npackages = 3").unwrap();
        assert!(packages.is_empty());
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let original = vec![
            Package::new("kernel").with_conditions(vec![
                Condition::new("version", ">=", "6.1"),
                Condition::new("evr", "<", "6.9.0-1"),
            ]),
            Package::new("glibc"),
        ];

        let toml_str = to_toml(&original).unwrap();
        assert!(toml_str.contains("version = \"1.0\""));

        let parsed = parse_versionlock_toml_str(&toml_str).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_parse_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
version = "1.0"

[[packages]]
name = "bash"
"#
        )
        .unwrap();

        let packages = parse_versionlock_toml(temp_file.path()).unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name(), "bash");
    }

    #[test]
    fn test_parse_nonexistent_file() {
        let result = parse_versionlock_toml(Path::new("/nonexistent/path/versionlock.toml"));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to read versionlock file"));
    }
}
