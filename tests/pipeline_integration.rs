//! End-to-end tests of the load pipeline through the public API.
//!
//! Every test uses `new_info`, so nothing here touches the process-wide
//! instance. Git and build-environment provenance are replaced with fixed
//! values to keep results independent of the machine running the tests.

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::TempDir;

use verstamp::core::types::{CommitHash, Dimension, TreeState};
use verstamp::enrich::{BuildMetadata, InjectedValues};
use verstamp::git::GitProbe;
use verstamp::{
    new_info, DimensionValidator, ErrorKind, FnValidator, LoadOptions, ValidationError,
};

const SVC: &str = r#"
manifest_version: "1.0"
project:
  name: svc
  version: 1.2.3
schemas:
  db: "47"
"#;

/// Git probe that never finds anything.
struct NoGit;

impl GitProbe for NoGit {
    fn head_commit(&self) -> Option<CommitHash> {
        None
    }

    fn exact_tag(&self) -> Option<String> {
        None
    }
}

/// Git probe with fixed answers.
struct RepoAt {
    commit: &'static str,
    tag: &'static str,
}

impl GitProbe for RepoAt {
    fn head_commit(&self) -> Option<CommitHash> {
        CommitHash::new(self.commit).ok()
    }

    fn exact_tag(&self) -> Option<String> {
        Some(self.tag.to_string())
    }
}

fn isolated() -> LoadOptions {
    LoadOptions::default()
        .without_manifest_path()
        .with_injected(InjectedValues::default())
        .with_build_metadata(None)
        .with_git_probe(Arc::new(NoGit))
}

fn embedded(manifest: &str) -> LoadOptions {
    isolated().with_embedded(manifest)
}

// ── Scenarios ───────────────────────────────────────────────────

#[test]
fn minimum_schema_satisfied() {
    let info = new_info(embedded(SVC).with_validator(DimensionValidator::min_schema("db", "45")))
        .unwrap();
    assert_eq!(info.schema_version("db"), Some("47"));
    assert_eq!(info.project().name, "svc");
    assert_eq!(info.project().version, "1.2.3");
}

#[test]
fn minimum_schema_too_old() {
    let err = new_info(embedded(SVC).with_validator(DimensionValidator::min_schema("db", "50")))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    assert_eq!(
        err.validation(),
        Some(&ValidationError::TooOld {
            dimension: Dimension::Schema,
            item: "db".to_string(),
            actual: "47".to_string(),
            minimum: "50".to_string(),
        })
    );
    let message = err.to_string();
    assert!(message.contains("db"));
    assert!(message.contains("47"));
    assert!(message.contains("50"));
}

#[test]
fn minimum_schema_missing_item() {
    let err = new_info(
        embedded(SVC).with_validator(DimensionValidator::min_schema("missing_db", "1")),
    )
    .unwrap_err();

    let rejection = err.validation().unwrap();
    assert!(matches!(rejection, ValidationError::NotFound { .. }));
    assert_eq!(rejection.item(), Some("missing_db"));
    assert!(err.hint().unwrap().contains("schemas:"));
}

#[test]
fn first_failure_stops_the_chain() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);

    let err = new_info(
        embedded(SVC)
            .with_validator(DimensionValidator::min_api("rest", "1"))
            .with_validator(FnValidator::new("spy", move |_, _| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })),
    )
    .unwrap_err();

    assert!(matches!(
        err.validation(),
        Some(ValidationError::NotFound {
            dimension: Dimension::Api,
            ..
        })
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn custom_policy_can_require_a_tag() {
    let require_tag = || {
        FnValidator::new("release-tag", |_, info| {
            if info.git().tag.is_empty() {
                Err(ValidationError::custom("release-tag", "builds must carry a tag"))
            } else {
                Ok(())
            }
        })
    };

    let err = new_info(embedded(SVC).with_validator(require_tag())).unwrap_err();
    assert!(err.to_string().contains("builds must carry a tag"));

    let tagged = embedded(SVC)
        .with_git_probe(Arc::new(RepoAt {
            commit: "0123abc",
            tag: "v1.2.3",
        }))
        .with_validator(require_tag());
    let info = new_info(tagged).unwrap();
    assert_eq!(info.git().tag, "v1.2.3");
    assert_eq!(info.git().commit, "0123abc");
}

// ── Sources ─────────────────────────────────────────────────────

#[test]
fn embedded_bytes_beat_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("versions.yaml");
    fs::write(&path, "project: {name: from-file, version: 9.9.9}\n").unwrap();

    let info = new_info(embedded(SVC).with_manifest_path(&path)).unwrap();
    assert_eq!(info.project().name, "svc");
}

#[test]
fn missing_file_strict_vs_lenient() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.yaml");

    let err = new_info(isolated().with_manifest_path(&path).with_strict_mode(true)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ManifestNotFound);
    assert!(!err.is_recoverable());

    let info = new_info(isolated().with_manifest_path(&path)).unwrap();
    assert_eq!(info.project().name, "unknown");
    assert_eq!(info.project().version, "0.0.0-dev");
}

#[test]
fn toml_manifest_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("versions.toml");
    fs::write(
        &path,
        "manifest_version = \"1.0\"\n\n[project]\nname = \"svc\"\nversion = \"3.1.0\"\n\n[apis]\nrest = \"v3\"\n",
    )
    .unwrap();

    let info = new_info(isolated().with_manifest_path(&path)).unwrap();
    assert_eq!(info.project().version, "3.1.0");
    assert_eq!(info.api_version("rest"), Some("v3"));
}

#[test]
fn malformed_manifest_is_never_recovered() {
    let err = new_info(embedded("project: {name: svc")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ManifestParse);
    assert!(err.hint().is_some());
}

// ── Provenance ──────────────────────────────────────────────────

#[test]
fn injected_then_build_then_git() {
    let injected = InjectedValues {
        tag: "v1.2.3".to_string(),
        build_time: "2024-06-01T10:00:00Z".to_string(),
        ..InjectedValues::default()
    };
    let build = BuildMetadata {
        revision: Some("feedbeef".to_string()),
        commit_time: Some("2024-05-31T08:00:00Z".to_string()),
        modified: Some(true),
    };

    let info = new_info(
        embedded(SVC)
            .with_injected(injected)
            .with_build_metadata(Some(build))
            .with_git_probe(Arc::new(RepoAt {
                commit: "1234567",
                tag: "v0.0.1",
            })),
    )
    .unwrap();

    assert_eq!(info.git().commit, "feedbeef");
    assert_eq!(info.git().tag, "v1.2.3");
    assert_eq!(info.git().tree_state, TreeState::Dirty);
    assert_eq!(info.git().commit_time, "2024-05-31T08:00:00Z");
    assert_eq!(info.build().time, "2024-06-01T10:00:00Z");
    assert!(!info.build().toolchain_version.is_empty());
}

#[test]
fn provenance_defaults_without_sources() {
    let info = new_info(embedded(SVC)).unwrap();
    assert_eq!(info.git().commit, "dev");
    assert!(!info.git().has_commit());
    assert_eq!(info.git().tree_state, TreeState::Clean);
    assert_eq!(info.build().time, "unknown");
}

// ── Snapshot ────────────────────────────────────────────────────

#[test]
fn dimension_maps_are_copies() {
    let info = new_info(embedded(SVC)).unwrap();

    let mut first = info.schemas();
    let second = info.schemas();
    assert_eq!(first, second);

    first.insert("db".to_string(), "1".to_string());
    first.insert("injected".to_string(), "2".to_string());

    assert_eq!(info.schemas(), second);
    assert_eq!(info.schema_version("db"), Some("47"));
    assert_eq!(info.schema_version("injected"), None);
}

#[test]
fn json_shape() {
    let info = new_info(embedded(SVC)).unwrap();
    let value = serde_json::to_value(&info).unwrap();

    assert_eq!(value["project"]["name"], "svc");
    assert_eq!(value["git"]["commit"], "dev");
    assert_eq!(value["git"]["tree_state"], "clean");
    assert!(value["git"].get("tag").is_none());
    assert!(value["build"]["toolchain_version"].is_string());
    assert_eq!(value["schemas"]["db"], "47");
    assert!(value.get("apis").is_none());
    assert!(value.get("loaded_at").is_none());
}
