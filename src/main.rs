mod app;
mod config;
mod domain;
mod git;
mod ui;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};

use crate::app::SessionOutcome;
use crate::git::{CliGitClient, GitClient};

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const HELP_TEXT: &str = "\
gitcz - interactive conventional-commit composer

USAGE:
  gitcz [OPTIONS]

OPTIONS:
  -c, --config <PATH>  Use an alternate catalog config file
      --catalog-json   Print the loaded catalogs as JSON and exit
  -h, --help           Print help and exit
  -V, --version        Print version and exit
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CliMode {
    RunTui,
    PrintHelp,
    PrintVersion,
    CatalogJson,
}

#[derive(Debug)]
struct CliOptions {
    mode: CliMode,
    config_path: Option<PathBuf>,
}

fn parse_cli<I, S>(args: I) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut mode = CliMode::RunTui;
    let mut config_path = None;
    let mut iter = args.into_iter().skip(1).map(Into::into);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => mode = CliMode::PrintHelp,
            "-V" | "--version" => mode = CliMode::PrintVersion,
            "--catalog-json" => mode = CliMode::CatalogJson,
            "-c" | "--config" => {
                let Some(path) = iter.next() else {
                    bail!("missing value for {arg}\n\n{HELP_TEXT}");
                };
                config_path = Some(PathBuf::from(path));
            }
            other => bail!("unknown option: {other}\n\n{HELP_TEXT}"),
        }
    }
    Ok(CliOptions { mode, config_path })
}

fn run_catalog_json(config_path: Option<PathBuf>) -> i32 {
    match config::load_catalogs(config_path) {
        Ok(report) => {
            let payload = serde_json::json!({
                "ok": true,
                "path": report.path.display().to_string(),
                "types": report.types,
                "scopes": report.scopes,
                "issues": report.issues,
                "dropped": report.dropped,
            });
            println!("{payload:#}");
            0
        }
        Err(err) => {
            let payload = serde_json::json!({
                "ok": false,
                "issues": [format!("{err:#}")],
            });
            println!("{payload:#}");
            2
        }
    }
}

async fn run_tui(config_path: Option<PathBuf>) -> Result<()> {
    let report = config::load_catalogs(config_path)?;

    let cwd = std::env::current_dir().context("failed reading current directory")?;
    let git = Arc::new(CliGitClient::new(cwd)) as Arc<dyn GitClient>;
    if !git
        .has_staged_changes()
        .await
        .context("failed checking for staged changes")?
    {
        bail!("no staged changes; stage files with `git add` first");
    }

    match app::run_app(report, git).await? {
        SessionOutcome::Committed { message } => {
            println!("{message}");
            Ok(())
        }
        SessionOutcome::Cancelled => {
            eprintln!("Commit cancelled.");
            Ok(())
        }
        SessionOutcome::CommitFailed { detail } => bail!("commit failed:\n{detail}"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let options = parse_cli(std::env::args())?;
    match options.mode {
        CliMode::PrintHelp => {
            println!("{HELP_TEXT}");
            Ok(())
        }
        CliMode::PrintVersion => {
            println!("{APP_NAME} {APP_VERSION}");
            Ok(())
        }
        CliMode::CatalogJson => std::process::exit(run_catalog_json(options.config_path)),
        CliMode::RunTui => run_tui(options.config_path).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_help() {
        let options = parse_cli(argv(&["gitcz", "--help"])).expect("help parses");
        assert_eq!(options.mode, CliMode::PrintHelp);
    }

    #[test]
    fn parse_version() {
        let options = parse_cli(argv(&["gitcz", "-V"])).expect("version parses");
        assert_eq!(options.mode, CliMode::PrintVersion);
    }

    #[test]
    fn parse_catalog_json_with_config_path() {
        let options = parse_cli(argv(&["gitcz", "-c", "/tmp/cz.json", "--catalog-json"]))
            .expect("catalog-json parses");
        assert_eq!(options.mode, CliMode::CatalogJson);
        assert_eq!(options.config_path, Some(PathBuf::from("/tmp/cz.json")));
    }

    #[test]
    fn parse_config_requires_value() {
        let err = parse_cli(argv(&["gitcz", "--config"])).expect_err("missing value rejected");
        assert!(err.to_string().contains("missing value for --config"));
    }

    #[test]
    fn parse_unknown_rejected() {
        let err = parse_cli(argv(&["gitcz", "--bogus"])).expect_err("unknown rejected");
        assert!(err.to_string().contains("unknown option: --bogus"));
    }
}
