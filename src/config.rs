use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::CatalogItem;

const EMPTY_CONFIG: &str = "{\n  \"types\": [],\n  \"scopes\": []\n}\n";

#[derive(Debug, Clone, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    types: Vec<RawItem>,
    #[serde(default)]
    scopes: Vec<RawItem>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawItem {
    #[serde(default)]
    code: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    desc: String,
}

#[derive(Debug, Clone)]
pub struct CatalogLoadReport {
    pub types: Vec<CatalogItem>,
    pub scopes: Vec<CatalogItem>,
    pub path: PathBuf,
    pub issues: Vec<String>,
    pub dropped: usize,
}

pub fn default_config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push("gitcz");
    base.push("config.json");
    Some(base)
}

/// Loads the catalog override file, creating it empty when absent.
///
/// Entries with an empty or duplicate code are dropped and counted in the
/// report. An unreadable or unparseable file is fatal; the user can recover
/// by deleting it.
pub fn load_catalogs(override_path: Option<PathBuf>) -> Result<CatalogLoadReport> {
    let path = match override_path {
        Some(path) => path,
        None => default_config_path().context("failed to locate user config directory")?,
    };

    let raw = if path.exists() {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config file {}", path.display()))?;
        serde_json::from_str::<RawConfig>(&text)
            .with_context(|| format!("failed parsing {} as JSON", path.display()))?
    } else {
        create_empty_config(&path)?;
        RawConfig::default()
    };

    let mut issues = Vec::new();
    let mut dropped = 0;
    let types = sift_items(raw.types, "types", &mut issues, &mut dropped);
    let scopes = sift_items(raw.scopes, "scopes", &mut issues, &mut dropped);

    let types = if types.is_empty() {
        default_types()
    } else {
        types
    };
    let scopes = if scopes.is_empty() {
        default_scopes()
    } else {
        scopes
    };

    Ok(CatalogLoadReport {
        types,
        scopes,
        path,
        issues,
        dropped,
    })
}

fn create_empty_config(path: &PathBuf) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating config directory {}", parent.display()))?;
    }
    fs::write(path, EMPTY_CONFIG)
        .with_context(|| format!("failed creating config file {}", path.display()))
}

fn sift_items(
    raw: Vec<RawItem>,
    list_name: &str,
    issues: &mut Vec<String>,
    dropped: &mut usize,
) -> Vec<CatalogItem> {
    let mut seen = HashSet::new();
    let mut items = Vec::new();
    let mut empty_codes = 0;

    for entry in raw {
        let code = entry.code.trim().to_string();
        if code.is_empty() {
            empty_codes += 1;
            *dropped += 1;
            continue;
        }
        if !seen.insert(code.clone()) {
            issues.push(format!("dropped duplicate code '{code}' from {list_name}"));
            *dropped += 1;
            continue;
        }
        let label = if entry.label.trim().is_empty() {
            code.clone()
        } else {
            entry.label.trim().to_string()
        };
        items.push(CatalogItem::new(code, label, entry.desc));
    }

    if empty_codes > 0 {
        issues.push(format!(
            "dropped {empty_codes} entr{} with an empty code from {list_name}",
            if empty_codes == 1 { "y" } else { "ies" }
        ));
    }
    items
}

pub fn default_types() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new("feat", "Feature Addition", "introduce new functionality."),
        CatalogItem::new("fix", "Bug Fix", "address and resolve issues or bugs."),
        CatalogItem::new(
            "refac",
            "Refactoring",
            "improve or organize code structure without changing the behavior.",
        ),
        CatalogItem::new(
            "docs",
            "Documentation Update",
            "update documentation or comments within the code itself.",
        ),
        CatalogItem::new("clean", "Code Cleanup", "remove unused code or redundant code."),
        CatalogItem::new(
            "deps",
            "Dependency Update",
            "update dependencies ensuring compatibility.",
        ),
        CatalogItem::new(
            "config",
            "Configuration Change",
            "modify config, such as scripts, environment, or CI/CD.",
        ),
        CatalogItem::new(
            "opt",
            "Optimization",
            "optimize code or algorithms for better performance or efficiency.",
        ),
        CatalogItem::new(
            "style",
            "Code Style Changes",
            "update code style, such as guidelines, indentation, naming conventions, or formatting.",
        ),
        CatalogItem::new("local", "Localization", "add or update localization files."),
        CatalogItem::new(
            "test",
            "Testing",
            "add, update, or fix tests to ensure code quality and functionality.",
        ),
        CatalogItem::new("revert", "Revert", "undo previous commit changes."),
        CatalogItem::new("merge", "Merge", "merge changes from one branch into another."),
        CatalogItem::new(
            "sec",
            "Security Fix",
            "address security vulnerabilities or weaknesses.",
        ),
        CatalogItem::new(
            "setup",
            "Project Setup",
            "setup the initial project structure, development tools or environment.",
        ),
        CatalogItem::new("debug", "Debugging", "commits for troubleshooting issues."),
    ]
}

pub fn default_scopes() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new(
            "environment",
            "Environment",
            "changes to project settings, config, or dependencies, updates to local, staging, or production, as well as changes to env variables or config files.",
        ),
        CatalogItem::new(
            "file",
            "File",
            "involve modifications to individual files within the codebase, such as adding, editing, or deleting files.",
        ),
        CatalogItem::new(
            "directory",
            "Directory",
            "changes to entire directories or folders within the project structure, including additions, modifications, or removals of directories and their contents.",
        ),
        CatalogItem::new(
            "database",
            "Database",
            "involve changes to the database schema, migrations, queries, or configurations, including additions, modifications, or removals of database tables, columns, indexes, or constraints.",
        ),
        CatalogItem::new(
            "server",
            "Server",
            "changes to server configurations, settings, or infrastructure, including updates to server configurations, deployments, server-side scripts, or server-related dependencies.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn temp_config_path(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        std::env::temp_dir()
            .join(format!("{prefix}-{}-{nanos}", std::process::id()))
            .join("config.json")
    }

    fn cleanup(path: &PathBuf) {
        if let Some(parent) = path.parent() {
            fs::remove_dir_all(parent).ok();
        }
    }

    #[test]
    fn default_catalogs_have_expected_sizes_and_unique_codes() {
        let types = default_types();
        let scopes = default_scopes();
        assert_eq!(types.len(), 16);
        assert_eq!(scopes.len(), 5);

        let codes: HashSet<_> = types.iter().map(|item| item.code.as_str()).collect();
        assert_eq!(codes.len(), types.len());
        assert!(types.iter().all(|item| !item.code.is_empty()));
        assert!(scopes.iter().all(|item| !item.code.is_empty()));
    }

    #[test]
    fn missing_config_is_created_and_defaults_apply() {
        let path = temp_config_path("gitcz-config-missing");
        let report = load_catalogs(Some(path.clone())).expect("load");
        assert!(path.exists());
        assert_eq!(report.types.len(), 16);
        assert_eq!(report.scopes.len(), 5);
        assert_eq!(report.dropped, 0);
        assert!(report.issues.is_empty());

        let created = fs::read_to_string(&path).expect("read created config");
        let json: serde_json::Value = serde_json::from_str(&created).expect("created is json");
        assert!(json["types"].as_array().expect("types array").is_empty());
        cleanup(&path);
    }

    #[test]
    fn corrupted_entry_is_dropped_and_counted() {
        let path = temp_config_path("gitcz-config-corrupt");
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(
            &path,
            r#"{
  "types": [
    {"code": "feat", "desc": "new stuff"},
    {"code": "", "desc": "nameless"},
    {"code": "fix", "desc": "bug stuff"}
  ],
  "scopes": []
}"#,
        )
        .expect("write config");

        let report = load_catalogs(Some(path.clone())).expect("load");
        assert_eq!(report.types.len(), 2);
        assert_eq!(report.dropped, 1);
        assert_eq!(report.issues.len(), 1);
        assert!(report.issues[0].contains("empty code"));
        // empty scopes list still falls back to defaults
        assert_eq!(report.scopes.len(), 5);
        cleanup(&path);
    }

    #[test]
    fn duplicate_codes_are_dropped_and_counted() {
        let path = temp_config_path("gitcz-config-dup");
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(
            &path,
            r#"{"types": [{"code": "feat", "desc": "a"}, {"code": "feat", "desc": "b"}]}"#,
        )
        .expect("write config");

        let report = load_catalogs(Some(path.clone())).expect("load");
        assert_eq!(report.types.len(), 1);
        assert_eq!(report.types[0].desc, "a");
        assert_eq!(report.dropped, 1);
        assert!(report.issues[0].contains("duplicate code 'feat'"));
        cleanup(&path);
    }

    #[test]
    fn loaded_entries_without_label_use_the_code() {
        let path = temp_config_path("gitcz-config-label");
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(
            &path,
            r#"{"types": [{"code": "wip", "desc": "work in progress"}]}"#,
        )
        .expect("write config");

        let report = load_catalogs(Some(path.clone())).expect("load");
        assert_eq!(report.types[0].label, "wip");
        cleanup(&path);
    }

    #[test]
    fn malformed_json_is_fatal() {
        let path = temp_config_path("gitcz-config-broken");
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, "{ not json").expect("write config");

        let err = load_catalogs(Some(path.clone())).expect_err("parse failure is fatal");
        assert!(err.to_string().contains("failed parsing"));
        cleanup(&path);
    }
}
