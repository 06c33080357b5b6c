//! core::manifest
//!
//! The user-authored manifest describing project and dimension versions.
//!
//! # Shape
//!
//! ```yaml
//! manifest_version: "1.0"
//! project:
//!   name: billing-service
//!   version: 2.4.1
//! schemas:
//!   postgres_main: 45
//! apis:
//!   rest: v2
//! components:
//!   ledger: 1.8.0
//! custom:
//!   region: eu-west-1
//! ```
//!
//! `project.name` and `project.version` are required and must be non-empty.
//! The dimension maps are optional. Integer values in the schemas, apis, and
//! components maps may be written unquoted and are kept as strings. Quote
//! anything with a single dot (`"1.10"`), which YAML would read as a float.
//!
//! # Formats
//!
//! YAML is the primary encoding. JSON and TOML files carry the same shape
//! and are selected by file extension.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::errors::VersionError;
use crate::core::types::CustomValue;

/// Current manifest format version.
pub const MANIFEST_FORMAT_VERSION: &str = "1.0";

/// Manifest file looked up when no path is configured.
pub const DEFAULT_MANIFEST_FILENAME: &str = "versions.yaml";

/// Project name used when no manifest is available.
pub const DEFAULT_PROJECT_NAME: &str = "unknown";

/// Project version used when no manifest is available.
pub const DEFAULT_PROJECT_VERSION: &str = "0.0.0-dev";

/// Encoding of a manifest document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManifestFormat {
    #[default]
    Yaml,
    Json,
    Toml,
}

impl ManifestFormat {
    /// Pick a format from a file extension. Unknown extensions read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => ManifestFormat::Json,
            Some("toml") => ManifestFormat::Toml,
            _ => ManifestFormat::Yaml,
        }
    }
}

impl fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ManifestFormat::Yaml => "YAML",
            ManifestFormat::Json => "JSON",
            ManifestFormat::Toml => "TOML",
        })
    }
}

/// Project identity declared by a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectManifest {
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub version: String,
}

/// A parsed version manifest.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, deserialize_with = "scalar_string")]
    pub manifest_version: String,

    #[serde(default)]
    pub project: ProjectManifest,

    #[serde(default, deserialize_with = "version_map", skip_serializing_if = "BTreeMap::is_empty")]
    pub schemas: BTreeMap<String, String>,

    #[serde(default, deserialize_with = "version_map", skip_serializing_if = "BTreeMap::is_empty")]
    pub apis: BTreeMap<String, String>,

    #[serde(default, deserialize_with = "version_map", skip_serializing_if = "BTreeMap::is_empty")]
    pub components: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom: BTreeMap<String, CustomValue>,
}

impl Manifest {
    /// The manifest used when no source is available and strict mode is off.
    pub fn fallback() -> Self {
        Manifest {
            manifest_version: MANIFEST_FORMAT_VERSION.to_string(),
            project: ProjectManifest {
                name: DEFAULT_PROJECT_NAME.to_string(),
                version: DEFAULT_PROJECT_VERSION.to_string(),
            },
            ..Default::default()
        }
    }

    /// Parse manifest bytes and check the required project fields.
    ///
    /// `origin` names the source in error messages.
    ///
    /// # Errors
    ///
    /// - [`VersionError::ManifestParse`] if the bytes are not valid in `format`
    /// - [`VersionError::InvalidManifest`] if `project.name` or `project.version` is empty
    pub fn parse(bytes: &[u8], format: ManifestFormat, origin: &str) -> Result<Self, VersionError> {
        let parse_error = |message: String| VersionError::ManifestParse {
            origin: origin.to_string(),
            message,
        };

        let mut manifest: Manifest = match format {
            ManifestFormat::Yaml => {
                serde_yaml::from_slice(bytes).map_err(|e| parse_error(e.to_string()))?
            }
            ManifestFormat::Json => {
                serde_json::from_slice(bytes).map_err(|e| parse_error(e.to_string()))?
            }
            ManifestFormat::Toml => {
                let text = std::str::from_utf8(bytes).map_err(|e| parse_error(e.to_string()))?;
                toml::from_str(text).map_err(|e| parse_error(e.to_string()))?
            }
        };

        if manifest.manifest_version.is_empty() {
            manifest.manifest_version = MANIFEST_FORMAT_VERSION.to_string();
        }
        manifest.check()?;
        Ok(manifest)
    }

    fn check(&self) -> Result<(), VersionError> {
        if self.project.name.is_empty() {
            return Err(VersionError::InvalidManifest {
                field: "project.name",
            });
        }
        if self.project.version.is_empty() {
            return Err(VersionError::InvalidManifest {
                field: "project.version",
            });
        }
        Ok(())
    }
}

/// A scalar written where a string is expected.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::String(s) => s,
            Scalar::Integer(n) => n.to_string(),
            Scalar::Float(x) => x.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Scalar> = Option::deserialize(deserializer)?;
    Ok(value.map(Scalar::into_string).unwrap_or_default())
}

fn version_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Scalar>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k, v.into_string()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ErrorKind;

    const FULL: &str = r#"
manifest_version: "1.0"
project:
  name: svc
  version: 1.2.3
schemas:
  db: "47"
  cache: 3
apis:
  rest: v2
components:
  ledger: 1.8.0
custom:
  region: eu-west-1
  replicas: 3
"#;

    #[test]
    fn parses_full_yaml() {
        let m = Manifest::parse(FULL.as_bytes(), ManifestFormat::Yaml, "test").unwrap();
        assert_eq!(m.manifest_version, "1.0");
        assert_eq!(m.project.name, "svc");
        assert_eq!(m.project.version, "1.2.3");
        assert_eq!(m.schemas["db"], "47");
        assert_eq!(m.schemas["cache"], "3");
        assert_eq!(m.apis["rest"], "v2");
        assert_eq!(m.components["ledger"], "1.8.0");
        assert_eq!(m.custom["region"], CustomValue::from("eu-west-1"));
        assert_eq!(m.custom["replicas"], CustomValue::Integer(3));
    }

    #[test]
    fn parses_json_and_toml() {
        let json = br#"{"project":{"name":"svc","version":"1.0.0"},"apis":{"grpc":"3"}}"#;
        let m = Manifest::parse(json, ManifestFormat::Json, "test").unwrap();
        assert_eq!(m.apis["grpc"], "3");

        let toml = b"[project]\nname = \"svc\"\nversion = \"1.0.0\"\n\n[components]\ncore = \"2.0\"\n";
        let m = Manifest::parse(toml, ManifestFormat::Toml, "test").unwrap();
        assert_eq!(m.components["core"], "2.0");
    }

    #[test]
    fn yaml_accepts_json_text() {
        let json = br#"{"project":{"name":"svc","version":"1.0.0"}}"#;
        let m = Manifest::parse(json, ManifestFormat::Yaml, "test").unwrap();
        assert_eq!(m.project.name, "svc");
    }

    #[test]
    fn missing_manifest_version_defaults() {
        let m = Manifest::parse(
            b"project: {name: svc, version: 1.0.0}",
            ManifestFormat::Yaml,
            "test",
        )
        .unwrap();
        assert_eq!(m.manifest_version, MANIFEST_FORMAT_VERSION);
        assert!(m.schemas.is_empty());
        assert!(m.custom.is_empty());
    }

    #[test]
    fn empty_project_name_is_invalid() {
        let err = Manifest::parse(
            b"project: {name: \"\", version: 1.0.0}",
            ManifestFormat::Yaml,
            "test",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            VersionError::InvalidManifest {
                field: "project.name"
            }
        ));
    }

    #[test]
    fn missing_project_version_is_invalid() {
        let err = Manifest::parse(b"project:\n  name: svc\n", ManifestFormat::Yaml, "test")
            .unwrap_err();
        assert!(matches!(
            err,
            VersionError::InvalidManifest {
                field: "project.version"
            }
        ));
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let err = Manifest::parse(b"project: [unclosed", ManifestFormat::Yaml, "inline")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ManifestParse);
        assert!(err.to_string().contains("inline"));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            ManifestFormat::from_path(Path::new("versions.json")),
            ManifestFormat::Json
        );
        assert_eq!(
            ManifestFormat::from_path(Path::new("conf/Versions.TOML")),
            ManifestFormat::Toml
        );
        assert_eq!(
            ManifestFormat::from_path(Path::new("versions.yml")),
            ManifestFormat::Yaml
        );
        assert_eq!(
            ManifestFormat::from_path(Path::new("versions")),
            ManifestFormat::Yaml
        );
    }

    #[test]
    fn fallback_manifest() {
        let m = Manifest::fallback();
        assert_eq!(m.project.name, "unknown");
        assert_eq!(m.project.version, "0.0.0-dev");
        assert_eq!(m.manifest_version, "1.0");
        assert!(m.schemas.is_empty() && m.apis.is_empty() && m.components.is_empty());
    }
}
