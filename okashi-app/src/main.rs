use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use okashi_actors::{SearchReport, StoreSnapshot};
use okashi_common::observability::{LogConfig, init_logging};
use okashi_config::{OkashiConfig, OkashiConfigLoader};
use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use wiring::Wiring;
mod wiring;

/// Search the Toriko snack database.
#[derive(Debug, Parser)]
#[command(name = "okashi", version)]
struct Cli {
    /// Configuration file. Defaults to ./okashi.yaml, then the per-user config dir.
    #[arg(long, env = "OKASHI_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Duplicate log output to stderr. Ignored by the terminal UI.
    #[arg(long, global = true)]
    log_stderr: bool,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Run a single search and print the resulting list.
    Search {
        /// Keyword to search for, or `-` to read it from stdin.
        keyword: OsString,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins)
    let cfg = load_config(cli.config.as_deref())?;

    // 2) Logging from config, CLI flag can only add stderr output
    let tui = cli.command.is_none();
    let stderr_requested = cli.log_stderr || cfg.logging.stderr;
    let log_path = init_logging(log_config(&cfg, stderr_requested, tui))?;
    tracing::info!(log = %log_path.display(), "app.start");
    if tui && stderr_requested {
        tracing::warn!("app.stderr_logging_disabled_for_tui");
    }

    match cli.command {
        None => run_tui(&cfg).await,
        Some(Cmd::Search { keyword, json }) => {
            let keyword = if keyword == "-" {
                read_keyword(std::io::stdin().lock())?
            } else {
                keyword.into_encoded_bytes()
            };
            run_headless(&cfg, keyword, json).await
        }
    }
}

/// The terminal UI owns the screen, so stderr output is only honoured headless.
fn log_config(cfg: &OkashiConfig, stderr_requested: bool, tui: bool) -> LogConfig {
    LogConfig {
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: stderr_requested && !tui,
        format: cfg.logging.format,
        default_filter: cfg.logging.filter.clone(),
        ..LogConfig::default()
    }
}

fn load_config(path: Option<&Path>) -> Result<OkashiConfig> {
    let loader = match path {
        Some(p) => OkashiConfigLoader::new().with_file(p),
        None => OkashiConfigLoader::new().with_default_files(),
    };
    loader.load().context("loading configuration")
}

async fn run_tui(cfg: &OkashiConfig) -> Result<()> {
    let mut wiring = Wiring::start(cfg)?;
    wiring.attach_tui().await?;
    wiring.run().await
}

async fn run_headless(cfg: &OkashiConfig, keyword: Vec<u8>, json: bool) -> Result<()> {
    let wiring = Wiring::start(cfg)?;
    let result = wiring.search_once(keyword).await;
    wiring.shutdown().await?;
    let (report, snap) = result?;

    let mut out = std::io::stdout().lock();
    if json {
        let doc = serde_json::json!({
            "report": report,
            "revision": snap.revision,
            "items": snap.items,
        });
        serde_json::to_writer_pretty(&mut out, &doc)?;
        writeln!(out)?;
    } else {
        out.write_all(render_table(&snap).as_bytes())?;
    }

    match report {
        SearchReport::Failed { kind } => bail!("search failed ({kind})"),
        SearchReport::StoreUnavailable => bail!("result store stopped before the search finished"),
        SearchReport::NoItems => {
            eprintln!("no item list in the response");
            Ok(())
        }
        SearchReport::Replaced { .. } => Ok(()),
    }
}

/// Read a keyword from `input`, dropping one trailing line ending.
fn read_keyword(mut input: impl Read) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    input
        .read_to_end(&mut buf)
        .context("reading keyword from stdin")?;
    if buf.ends_with(b"\n") {
        buf.pop();
        if buf.ends_with(b"\r") {
            buf.pop();
        }
    }
    Ok(buf)
}

fn render_table(snap: &StoreSnapshot) -> String {
    let mut s = String::new();
    for (i, item) in snap.items.iter().enumerate() {
        s.push_str(&format!("{:>3}  {}\n", i + 1, item.name()));
        s.push_str(&format!("     {}\n", item.detail_url()));
        s.push_str(&format!("     {}\n", item.image_url()));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use okashi_api::ResultItem;
    use url::Url;

    #[test]
    fn search_subcommand_parses() {
        let cli = Cli::try_parse_from(["okashi", "search", "pocky sticks", "--json"]).unwrap();
        match cli.command {
            Some(Cmd::Search { keyword, json }) => {
                assert_eq!(keyword, "pocky sticks");
                assert!(json);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(!cli.log_stderr);
    }

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["okashi", "--config", "x.yaml", "--log-stderr"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config.as_deref(), Some(Path::new("x.yaml")));
        assert!(cli.log_stderr);
    }

    #[test]
    fn stdin_keyword_loses_one_line_ending() {
        assert_eq!(read_keyword(&b"pocky\n"[..]).unwrap(), b"pocky");
        assert_eq!(read_keyword(&b"pocky\r\n"[..]).unwrap(), b"pocky");
        assert_eq!(read_keyword(&b"a b\n\n"[..]).unwrap(), b"a b\n");
        assert_eq!(read_keyword(&[0xff, 0xfe][..]).unwrap(), [0xff, 0xfe]);
    }

    #[test]
    fn table_lists_items_in_order() {
        let items = vec![
            ResultItem::new(
                "Pocky",
                Url::parse("https://sysbird.jp/toriko/1").unwrap(),
                Url::parse("https://sysbird.jp/toriko/1.jpg").unwrap(),
            ),
            ResultItem::new(
                "Pretz",
                Url::parse("https://sysbird.jp/toriko/2").unwrap(),
                Url::parse("https://sysbird.jp/toriko/2.jpg").unwrap(),
            ),
        ];
        let table = render_table(&StoreSnapshot {
            revision: 1,
            items: items.into(),
        });
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "  1  Pocky");
        assert_eq!(lines[3], "  2  Pretz");
        assert_eq!(lines[4], "     https://sysbird.jp/toriko/2");
    }

    #[test]
    fn stderr_logging_is_never_enabled_under_the_tui() {
        let mut cfg = OkashiConfig::default();
        cfg.logging.stderr = true;
        assert!(!log_config(&cfg, true, true).emit_stderr);
        assert!(log_config(&cfg, true, false).emit_stderr);
        assert!(!log_config(&OkashiConfig::default(), false, false).emit_stderr);
        assert_eq!(log_config(&cfg, true, true).default_filter, "info");
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        assert!(load_config(Some(Path::new("/definitely/not/here/okashi.yaml"))).is_err());
    }
}
