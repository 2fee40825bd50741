use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clonify_common::observability::{LogConfig, init_logging};
use clonify_config::{ClonifyConfig, ClonifyConfigLoader};
use std::path::PathBuf;

mod headless;
mod tether;

use headless::{CloneArgs, Section};

#[derive(Parser, Debug)]
#[command(name = "clonify", version, about = "Clone a website's HTML, CSS and JavaScript")]
struct Cli {
    /// YAML config file; defaults to ./clonify.yaml or the user config file.
    #[arg(long, global = true, env = "CLONIFY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Interactive terminal UI (the default).
    Tui,
    /// Clone one URL and print the result.
    Clone {
        url: String,
        #[arg(long, value_enum, default_value_t = Section::All)]
        section: Section,
        /// Print the whole result as JSON.
        #[arg(long)]
        json: bool,
        /// Also save the page markup as a download file.
        #[arg(long)]
        save: bool,
        /// Directory for --save; overrides download.dir.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg: ClonifyConfig = ClonifyConfigLoader::new()
        .with_discovered_files(cli.config.as_deref())
        .load()
        .context("loading configuration")?;

    match cli.command.unwrap_or(Cmd::Tui) {
        Cmd::Tui => {
            let log_path = init_logging(log_config(&cfg, false))?;
            install_hooks()?;
            tracing::info!(log = %log_path.display(), "app.start");
            let res = tether::run_tui(&cfg).await;
            clonify_tui::restore_terminal();
            res
        }
        Cmd::Clone {
            url,
            section,
            json,
            save,
            out,
        } => {
            init_logging(log_config(&cfg, true))?;
            let args = CloneArgs {
                url,
                section,
                json,
                save: save || out.is_some(),
                out,
            };
            headless::run(&cfg, args).await
        }
    }
}

fn log_config(cfg: &ClonifyConfig, emit_stderr: bool) -> LogConfig {
    LogConfig {
        log_dir: cfg.logging.dir.clone(),
        emit_stderr,
        format: cfg.logging.format,
        default_filter: cfg.logging.filter.clone(),
        ..LogConfig::default()
    }
}

/// A panic must hand the terminal back before the report is printed.
fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install()?;
    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        clonify_tui::restore_terminal();
        panic_hook(info);
    }));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["clonify"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn clone_flags_parse() {
        let cli = Cli::try_parse_from([
            "clonify",
            "clone",
            "https://example.com",
            "--section",
            "css",
            "--json",
            "--out",
            "/tmp/x",
            "--config",
            "c.yaml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.yaml")));
        match cli.command {
            Some(Cmd::Clone {
                url,
                section,
                json,
                save,
                out,
            }) => {
                assert_eq!(url, "https://example.com");
                assert_eq!(section, Section::Css);
                assert!(json);
                assert!(!save);
                assert_eq!(out, Some(PathBuf::from("/tmp/x")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_section_is_rejected() {
        assert!(Cli::try_parse_from(["clonify", "clone", "https://x.io", "--section", "svg"]).is_err());
    }
}
