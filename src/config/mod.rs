//! Configuration loading and management

use crate::core::error::ConfigError;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings of a single lookup
///
/// # Example
///
/// ```yaml
/// title: People
/// dialog: people-dialog
/// url: /lookups/people
/// multi: true
/// default_sort_column: email
/// additional_filters:
///   - country
///   - active
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Dialog title shown by the client control
    pub title: Option<String>,

    /// Client-side dialog identifier
    pub dialog: Option<String>,

    /// Endpoint the client control queries
    pub url: Option<String>,

    /// Whether the control allows selecting several records
    pub multi: bool,

    /// Column used when the request does not ask for a sort
    pub default_sort_column: Option<String>,

    /// Fields clients may constrain with additional filters
    pub additional_filters: IndexSet<String>,
}

impl LookupConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let (content, file) = read_file(path.as_ref())?;
        parse_yaml(&content, Some(file))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        parse_yaml(yaml, None)
    }

    /// Declare a field clients may filter on
    pub fn with_additional_filter(mut self, field: impl Into<String>) -> Self {
        self.additional_filters.insert(field.into());
        self
    }

    pub fn with_default_sort_column(mut self, column: impl Into<String>) -> Self {
        self.default_sort_column = Some(column.into());
        self
    }
}

/// Settings of several lookups keyed by registry name
///
/// ```yaml
/// lookups:
///   people:
///     title: People
///     additional_filters: [country]
///   countries:
///     multi: true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupsConfig {
    #[serde(default)]
    pub lookups: IndexMap<String, LookupConfig>,
}

impl LookupsConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let (content, file) = read_file(path.as_ref())?;
        parse_yaml(&content, Some(file))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        parse_yaml(yaml, None)
    }

    /// Settings of the lookup registered under `name`, defaults when absent
    pub fn lookup(&self, name: &str) -> LookupConfig {
        self.lookups.get(name).cloned().unwrap_or_default()
    }
}

fn read_file(path: &Path) -> Result<(String, String), ConfigError> {
    let file = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ConfigError::FileNotFound { path: file.clone() },
        _ => ConfigError::ParseError {
            file: Some(file.clone()),
            message: e.to_string(),
        },
    })?;
    Ok((content, file))
}

fn parse_yaml<T: serde::de::DeserializeOwned>(yaml: &str, file: Option<String>) -> Result<T, ConfigError> {
    serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
        file,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_yaml_str() {
        let yaml = r#"
title: People
url: /lookups/people
multi: true
default_sort_column: email
additional_filters:
  - country
  - active
  - country
"#;
        let config = LookupConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.title.as_deref(), Some("People"));
        assert_eq!(config.url.as_deref(), Some("/lookups/people"));
        assert!(config.multi);
        assert!(config.dialog.is_none());
        assert_eq!(config.default_sort_column.as_deref(), Some("email"));
        let filters: Vec<&str> = config.additional_filters.iter().map(|f| f.as_str()).collect();
        assert_eq!(filters, vec!["country", "active"]);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = LookupConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, LookupConfig::default());
        assert!(!config.multi);
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let err = LookupConfig::from_yaml_str("multi: [not a bool").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_PARSE_ERROR");
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "lookups:\n  people:\n    title: People\n  countries:\n    multi: true").unwrap();

        let config = LookupsConfig::from_yaml_file(file.path()).unwrap();
        let names: Vec<&str> = config.lookups.keys().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["people", "countries"]);
        assert_eq!(config.lookup("people").title.as_deref(), Some("People"));
        assert!(config.lookup("countries").multi);
        assert_eq!(config.lookup("missing"), LookupConfig::default());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        let err = LookupConfig::from_yaml_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}
