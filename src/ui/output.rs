//! ui::output
//!
//! Text projections of a snapshot for the command line.
//!
//! # Design
//!
//! Every projection is rendered to a `String` so the CLI only decides which
//! one to print. Sections are a title line followed by aligned
//! `label: value` rows; map-valued sections list their keys sorted.

use std::collections::BTreeMap;
use std::fmt::Display;

use crate::core::info::Info;

/// Which view of the snapshot to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    #[default]
    Full,
    Compact,
    Json,
    Schemas,
    Apis,
    Components,
    Git,
    Build,
}

/// Render `info` in the requested projection.
///
/// # Errors
///
/// Only the JSON projection can fail.
pub fn render(info: &Info, projection: Projection) -> Result<String, serde_json::Error> {
    Ok(match projection {
        Projection::Full => render_full(info),
        Projection::Compact => info.to_string(),
        Projection::Json => serde_json::to_string_pretty(info)?,
        Projection::Schemas => {
            render_dimension("Database Schemas", &info.schemas(), "No database schemas defined")
        }
        Projection::Apis => render_dimension("API Versions", &info.apis(), "No API versions defined"),
        Projection::Components => render_dimension(
            "Component Versions",
            &info.components(),
            "No component versions defined",
        ),
        Projection::Git => git_section(info).render(),
        Projection::Build => build_section(info).render(),
    })
}

/// Every section, blank-line separated. Empty dimensions are skipped.
pub fn render_full(info: &Info) -> String {
    let mut sections = vec![
        Section::new("Project Information")
            .row("Name", &info.project().name)
            .row("Version", &info.project().version),
        git_section(info),
        build_section(info),
    ];
    for (title, map) in [
        ("Database Schemas", info.schemas()),
        ("API Versions", info.apis()),
        ("Component Versions", info.components()),
    ] {
        if !map.is_empty() {
            sections.push(Section::from_map(title, &map));
        }
    }
    let custom = info.custom();
    if !custom.is_empty() {
        sections.push(Section::from_map("Custom Metadata", &custom));
    }

    sections
        .iter()
        .map(Section::render)
        .collect::<Vec<_>>()
        .join("\n")
}

/// One dimension, or `empty` if it has no entries.
pub fn render_dimension(title: &str, map: &BTreeMap<String, String>, empty: &str) -> String {
    if map.is_empty() {
        format!("{empty}\n")
    } else {
        Section::from_map(title, map).render()
    }
}

fn git_section(info: &Info) -> Section {
    let git = info.git();
    Section::new("Git Information")
        .row("Commit", &git.commit)
        .row_if_set("Tag", &git.tag)
        .row("Tree State", git.tree_state)
        .row_if_set("Commit Time", &git.commit_time)
}

fn build_section(info: &Info) -> Section {
    let build = info.build();
    Section::new("Build Information")
        .row("Time", &build.time)
        .row_if_set("User", &build.user)
        .row("Rust Version", &build.toolchain_version)
}

struct Section {
    title: String,
    rows: Vec<(String, String)>,
}

impl Section {
    fn new(title: &str) -> Self {
        Section {
            title: title.to_string(),
            rows: Vec::new(),
        }
    }

    fn from_map<V: Display>(title: &str, map: &BTreeMap<String, V>) -> Self {
        map.iter()
            .fold(Section::new(title), |section, (k, v)| section.row(k, v))
    }

    fn row(mut self, label: &str, value: impl Display) -> Self {
        self.rows.push((format!("{label}:"), value.to_string()));
        self
    }

    fn row_if_set(self, label: &str, value: &str) -> Self {
        if value.is_empty() {
            self
        } else {
            self.row(label, value)
        }
    }

    fn render(&self) -> String {
        let width = self.rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0) + 2;
        let mut out = format!("{}:\n", self.title);
        for (label, value) in &self.rows {
            out.push_str(&format!("  {label:<width$}{value}\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::new_info;
    use crate::engine::testing::hermetic;

    fn info() -> Info {
        new_info(
            hermetic(
                "project: {name: svc, version: 1.2.3}\n\
                 schemas: {users: \"12\", db: \"47\"}\n\
                 custom: {region: eu}\n",
            )
            .with_build_info(false),
        )
        .unwrap()
    }

    #[test]
    fn compact_line() {
        assert_eq!(render(&info(), Projection::Compact).unwrap(), "svc 1.2.3 (dev)");
    }

    #[test]
    fn dimension_rows_are_sorted_and_aligned() {
        let out = render(&info(), Projection::Schemas).unwrap();
        assert_eq!(out, "Database Schemas:\n  db:     47\n  users:  12\n");
    }

    #[test]
    fn empty_dimension_message() {
        let out = render(&info(), Projection::Apis).unwrap();
        assert_eq!(out, "No API versions defined\n");
    }

    #[test]
    fn git_section_omits_unset_fields() {
        let out = render(&info(), Projection::Git).unwrap();
        assert_eq!(out, "Git Information:\n  Commit:      dev\n  Tree State:  clean\n");
    }

    #[test]
    fn full_view_has_populated_sections_only() {
        let out = render_full(&info());
        assert!(out.starts_with("Project Information:\n  Name:     svc\n"));
        assert!(out.contains("Database Schemas:"));
        assert!(out.contains("Custom Metadata:\n  region:  eu\n"));
        assert!(!out.contains("API Versions"));
        assert!(!out.contains("Component Versions"));
    }

    #[test]
    fn json_view_parses() {
        let out = render(&info(), Projection::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["schemas"]["db"], "47");
    }
}
