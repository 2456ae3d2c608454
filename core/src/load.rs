//! Reading and writing specification files.
//!
//! Files ending in `.yml` or `.yaml` are YAML; anything else is JSON.
//!
//! # Example YAML
//!
//! ```yaml
//! name: deploy
//! description: Deploy the current build
//! usage: deploy [OPTIONS] <ENV>
//! aliases: [ship]
//! flags:
//!   force:
//!     type: boolean
//!     char: f
//!   region:
//!     type: string
//!     char: r
//!     description: Target region
//! args:
//!   - name: env
//!     required: true
//!     options: [staging, prod]
//! examples:
//!   - deploy -f prod
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tracing::debug;

use crate::CommandSpec;
use crate::error::LoadError;

/// Serialization format of a specification file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Json,
    Yaml,
}

impl SpecFormat {
    /// Picks the format from a file extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_spec_core::SpecFormat;
    ///
    /// assert_eq!(SpecFormat::from_path("cmd.yaml"), SpecFormat::Yaml);
    /// assert_eq!(SpecFormat::from_path("cmd.YML"), SpecFormat::Yaml);
    /// assert_eq!(SpecFormat::from_path("cmd.json"), SpecFormat::Json);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yml" | "yaml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

impl CommandSpec {
    /// Loads a specification from a YAML or JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](LoadError::IoError) if the file cannot be read, or
    /// a JSON/YAML error if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let spec: Self = match SpecFormat::from_path(path) {
            SpecFormat::Yaml => serde_yaml::from_reader(reader)?,
            SpecFormat::Json => serde_json::from_reader(reader)?,
        };
        debug!(path = %path.display(), command = %spec.name, flags = spec.flags.len(), "loaded spec");
        Ok(spec)
    }

    /// Saves the specification, choosing the format from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](LoadError::IoError) if the file cannot be written,
    /// or a JSON/YAML error if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let path = path.as_ref();
        let writer = BufWriter::new(File::create(path)?);
        match SpecFormat::from_path(path) {
            SpecFormat::Yaml => serde_yaml::to_writer(writer, self)?,
            SpecFormat::Json => serde_json::to_writer_pretty(writer, self)?,
        }
        Ok(())
    }

    /// Parses a specification from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, LoadError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses a specification from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::FlagKind;

    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
name: deploy
description: Deploy the current build
usage: deploy [OPTIONS] <ENV>
aliases: [ship]
flags:
  force:
    type: boolean
    char: f
  region:
    type: string
    char: r
    description: Target region
args:
  - name: env
    required: true
    options: [staging, prod]
  - name: tag
    default: latest
examples:
  - deploy -f prod
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let spec = CommandSpec::from_yaml_str(sample_yaml()).unwrap();

        assert_eq!(spec.name, "deploy");
        assert_eq!(spec.usage, vec!["deploy [OPTIONS] <ENV>"]);
        assert_eq!(spec.aliases, vec!["ship"]);
        assert_eq!(spec.flags.get("force").map(|f| f.kind), Some(FlagKind::Boolean));
        assert_eq!(spec.flags.get("region").and_then(|f| f.short), Some('r'));
        assert_eq!(spec.arg_names(), vec!["env", "tag"]);
        assert!(spec.args[0].required);
        assert_eq!(spec.args[1].default.as_ref().map(|d| d.resolve()).as_deref(), Some("latest"));
        assert_eq!(spec.examples, vec!["deploy -f prod"]);
    }

    #[test]
    fn test_deserialize_minimal() {
        let spec = CommandSpec::from_json_str(r#"{"name": "noop"}"#).unwrap();

        assert_eq!(spec.name, "noop");
        assert!(spec.flags.is_empty());
        assert!(spec.args.is_empty());
        assert!(!spec.hidden);
    }

    #[test]
    fn test_rejects_unknown_flag_type() {
        let yaml = "name: x\nflags:\n  count:\n    type: number\n";
        assert!(matches!(
            CommandSpec::from_yaml_str(yaml),
            Err(LoadError::YamlError(_))
        ));
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let original = CommandSpec::from_yaml_str(sample_yaml()).unwrap();

        for file in ["spec.yaml", "spec.json"] {
            let path = dir.path().join(file);
            original.save(&path).unwrap();

            let loaded = CommandSpec::load(&path).unwrap();
            assert_eq!(loaded.name, original.name);
            assert_eq!(loaded.flags, original.flags);
            assert_eq!(loaded.arg_names(), original.arg_names());
            assert_eq!(loaded.usage, original.usage);
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            CommandSpec::load(dir.path().join("absent.json")),
            Err(LoadError::IoError(_))
        ));
    }
}
