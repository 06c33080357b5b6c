//! core::info
//!
//! The frozen runtime snapshot of version metadata.
//!
//! # Immutability
//!
//! An [`Info`] is built from a [`Manifest`], enriched with provenance by the
//! loading pipeline, validated, and only then handed out. Its fields are
//! private; callers read them through accessors. The dimension maps are
//! returned as owned copies, so a caller can never alias or mutate the
//! snapshot's own data. This makes a published `Info` safe to share across
//! threads without locking.
//!
//! # JSON
//!
//! ```json
//! {
//!   "project": {"name": "svc", "version": "1.2.3"},
//!   "git": {"commit": "abc1234", "tag": "v1.2.3", "tree_state": "clean"},
//!   "build": {"time": "2024-01-01T00:00:00Z", "toolchain_version": "rustc 1.80.0"},
//!   "schemas": {"db": "47"}
//! }
//! ```
//!
//! Empty optional strings and empty maps are omitted. The load timestamp is
//! never serialized.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::manifest::Manifest;
use crate::core::types::{CustomValue, TreeState};

/// Commit value meaning "no provenance found".
pub const DEFAULT_GIT_COMMIT: &str = "dev";

/// Build time value meaning "not injected".
pub const DEFAULT_BUILD_TIME: &str = "unknown";

/// Toolchain version used only if the build script could not capture one.
pub const DEFAULT_TOOLCHAIN_VERSION: &str = "unknown";

/// Version of the compiler that built this crate.
pub fn toolchain_version() -> &'static str {
    option_env!("VERSTAMP_RUSTC_VERSION").unwrap_or(DEFAULT_TOOLCHAIN_VERSION)
}

/// Project identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectVersion {
    pub name: String,
    pub version: String,
}

/// Source control provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitInfo {
    pub commit: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
    pub tree_state: TreeState,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub commit_time: String,
}

impl Default for GitInfo {
    fn default() -> Self {
        GitInfo {
            commit: DEFAULT_GIT_COMMIT.to_string(),
            tag: String::new(),
            tree_state: TreeState::Clean,
            commit_time: String::new(),
        }
    }
}

impl GitInfo {
    /// Check whether any source supplied a commit.
    pub fn has_commit(&self) -> bool {
        self.commit != DEFAULT_GIT_COMMIT
    }
}

/// Build provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    pub time: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user: String,
    pub toolchain_version: String,
}

impl Default for BuildInfo {
    fn default() -> Self {
        BuildInfo {
            time: DEFAULT_BUILD_TIME.to_string(),
            user: String::new(),
            toolchain_version: toolchain_version().to_string(),
        }
    }
}

/// Enriched, validated version metadata.
///
/// Obtain one through [`crate::engine::get`] (process-wide) or
/// [`crate::engine::new_info`] (independent).
#[derive(Debug, Clone)]
pub struct Info {
    pub(crate) project: ProjectVersion,
    pub(crate) git: GitInfo,
    pub(crate) build: BuildInfo,
    schemas: Arc<BTreeMap<String, String>>,
    apis: Arc<BTreeMap<String, String>>,
    components: Arc<BTreeMap<String, String>>,
    custom: Arc<BTreeMap<String, CustomValue>>,
    loaded_at: DateTime<Utc>,
}

impl Info {
    /// Build a snapshot with default provenance from a manifest.
    ///
    /// The manifest's maps are moved into storage owned by the snapshot, and
    /// the load timestamp is captured here, before any enrichment runs.
    pub(crate) fn from_manifest(manifest: Manifest) -> Self {
        Info {
            project: ProjectVersion {
                name: manifest.project.name,
                version: manifest.project.version,
            },
            git: GitInfo::default(),
            build: BuildInfo::default(),
            schemas: Arc::new(manifest.schemas),
            apis: Arc::new(manifest.apis),
            components: Arc::new(manifest.components),
            custom: Arc::new(manifest.custom),
            loaded_at: Utc::now(),
        }
    }

    pub fn project(&self) -> &ProjectVersion {
        &self.project
    }

    pub fn git(&self) -> &GitInfo {
        &self.git
    }

    pub fn build(&self) -> &BuildInfo {
        &self.build
    }

    /// Version of a database schema.
    pub fn schema_version(&self, name: &str) -> Option<&str> {
        self.schemas.get(name).map(String::as_str)
    }

    /// Version of an API.
    pub fn api_version(&self, name: &str) -> Option<&str> {
        self.apis.get(name).map(String::as_str)
    }

    /// Version of a component.
    pub fn component_version(&self, name: &str) -> Option<&str> {
        self.components.get(name).map(String::as_str)
    }

    /// A value from the custom dimension, copied out.
    pub fn custom_value(&self, key: &str) -> Option<CustomValue> {
        self.custom.get(key).cloned()
    }

    /// Copy of all schema versions.
    pub fn schemas(&self) -> BTreeMap<String, String> {
        self.schemas.as_ref().clone()
    }

    /// Copy of all API versions.
    pub fn apis(&self) -> BTreeMap<String, String> {
        self.apis.as_ref().clone()
    }

    /// Copy of all component versions.
    pub fn components(&self) -> BTreeMap<String, String> {
        self.components.as_ref().clone()
    }

    /// Copy of the custom dimension.
    pub fn custom(&self) -> BTreeMap<String, CustomValue> {
        self.custom.as_ref().clone()
    }

    /// When this snapshot was constructed, before enrichment.
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Structured logging fields describing this snapshot.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("project_name", self.project.name.clone()),
            ("project_version", self.project.version.clone()),
            ("git_commit", self.git.commit.clone()),
            ("git_tag", self.git.tag.clone()),
            ("git_tree_state", self.git.tree_state.to_string()),
            ("build_time", self.build.time.clone()),
            ("build_user", self.build.user.clone()),
            ("toolchain_version", self.build.toolchain_version.clone()),
        ]
    }

    /// A tracing span carrying the snapshot's identity.
    ///
    /// Events recorded inside the span inherit the version fields.
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!(
            "version",
            project_name = %self.project.name,
            project_version = %self.project.version,
            git_commit = %self.git.commit,
            git_tag = %self.git.tag,
            git_tree_state = %self.git.tree_state,
            build_time = %self.build.time,
            toolchain_version = %self.build.toolchain_version,
        )
    }
}

impl fmt::Display for Info {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({})",
            self.project.name, self.project.version, self.git.commit
        )
    }
}

fn is_empty_map<K, V>(map: &&BTreeMap<K, V>) -> bool {
    map.is_empty()
}

#[derive(Serialize)]
struct InfoRef<'a> {
    project: &'a ProjectVersion,
    git: &'a GitInfo,
    build: &'a BuildInfo,
    #[serde(skip_serializing_if = "is_empty_map")]
    schemas: &'a BTreeMap<String, String>,
    #[serde(skip_serializing_if = "is_empty_map")]
    apis: &'a BTreeMap<String, String>,
    #[serde(skip_serializing_if = "is_empty_map")]
    components: &'a BTreeMap<String, String>,
    #[serde(skip_serializing_if = "is_empty_map")]
    custom: &'a BTreeMap<String, CustomValue>,
}

#[derive(Deserialize)]
struct InfoOwned {
    project: ProjectVersion,
    git: GitInfo,
    build: BuildInfo,
    #[serde(default)]
    schemas: BTreeMap<String, String>,
    #[serde(default)]
    apis: BTreeMap<String, String>,
    #[serde(default)]
    components: BTreeMap<String, String>,
    #[serde(default)]
    custom: BTreeMap<String, CustomValue>,
}

impl Serialize for Info {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        InfoRef {
            project: &self.project,
            git: &self.git,
            build: &self.build,
            schemas: &self.schemas,
            apis: &self.apis,
            components: &self.components,
            custom: &self.custom,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Info {
    /// Reads the serialized shape back. The load timestamp becomes the time
    /// of deserialization.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let owned = InfoOwned::deserialize(deserializer)?;
        Ok(Info {
            project: owned.project,
            git: owned.git,
            build: owned.build,
            schemas: Arc::new(owned.schemas),
            apis: Arc::new(owned.apis),
            components: Arc::new(owned.components),
            custom: Arc::new(owned.custom),
            loaded_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::ManifestFormat;

    fn sample() -> Info {
        let manifest = Manifest::parse(
            br#"
project: {name: svc, version: 1.2.3}
schemas: {db: "47"}
apis: {rest: v2}
components: {ledger: 1.8.0}
custom: {region: eu-west-1}
"#,
            ManifestFormat::Yaml,
            "test",
        )
        .unwrap();
        Info::from_manifest(manifest)
    }

    #[test]
    fn copies_project_from_manifest() {
        let info = sample();
        assert_eq!(info.project().name, "svc");
        assert_eq!(info.project().version, "1.2.3");
    }

    #[test]
    fn provenance_starts_at_defaults() {
        let info = sample();
        assert_eq!(info.git().commit, DEFAULT_GIT_COMMIT);
        assert!(!info.git().has_commit());
        assert_eq!(info.git().tree_state, TreeState::Clean);
        assert!(info.git().tag.is_empty());
        assert_eq!(info.build().time, DEFAULT_BUILD_TIME);
        assert_eq!(info.build().toolchain_version, toolchain_version());
    }

    #[test]
    fn dimension_lookups() {
        let info = sample();
        assert_eq!(info.schema_version("db"), Some("47"));
        assert_eq!(info.schema_version("missing"), None);
        assert_eq!(info.api_version("rest"), Some("v2"));
        assert_eq!(info.component_version("ledger"), Some("1.8.0"));
        assert_eq!(info.custom_value("region"), Some(CustomValue::from("eu-west-1")));
    }

    #[test]
    fn map_accessors_return_independent_copies() {
        let info = sample();
        let mut first = info.schemas();
        first.insert("db".into(), "1".into());
        first.insert("extra".into(), "2".into());

        let second = info.schemas();
        assert_eq!(second.get("db").map(String::as_str), Some("47"));
        assert!(!second.contains_key("extra"));
        assert_eq!(info.schema_version("db"), Some("47"));

        let mut custom = info.custom();
        custom.clear();
        assert_eq!(info.custom().len(), 1);
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(sample().to_string(), "svc 1.2.3 (dev)");
    }

    #[test]
    fn json_shape_omits_empty_and_internal_fields() {
        let manifest = Manifest::fallback();
        let info = Info::from_manifest(manifest);
        let value = serde_json::to_value(&info).unwrap();

        assert_eq!(value["project"]["name"], "unknown");
        assert_eq!(value["git"]["commit"], "dev");
        assert_eq!(value["git"]["tree_state"], "clean");
        assert!(value["git"].get("tag").is_none());
        assert!(value["git"].get("commit_time").is_none());
        assert!(value["build"].get("user").is_none());
        assert!(value.get("schemas").is_none());
        assert!(value.get("custom").is_none());
        assert!(value.get("loaded_at").is_none());
    }

    #[test]
    fn json_round_trip_preserves_content() {
        let info = sample();
        let json = serde_json::to_string(&info).unwrap();
        let back: Info = serde_json::from_str(&json).unwrap();
        assert_eq!(back.project(), info.project());
        assert_eq!(back.git(), info.git());
        assert_eq!(back.schemas(), info.schemas());
        assert_eq!(back.custom(), info.custom());
    }

    #[test]
    fn log_fields_cover_provenance() {
        let fields = sample().log_fields();
        let names: Vec<&str> = fields.iter().map(|(k, _)| *k).collect();
        assert!(names.contains(&"project_version"));
        assert!(names.contains(&"git_commit"));
        assert!(names.contains(&"toolchain_version"));
    }
}
