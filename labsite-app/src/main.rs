use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use labsite_common::observability::{LogConfig, LogFormat, init_logging};
use labsite_config::{DEFAULT_CONFIG_FILE, LabsiteConfig, LabsiteConfigLoader};
use std::path::PathBuf;
mod commands;

/// Maintenance pipelines for the lab website's achievements data.
#[derive(Debug, Parser)]
#[command(name = "labsite", version)]
struct Cli {
    /// YAML config file (default: ./labsite.yaml when present).
    #[arg(long, global = true, env = "LABSITE_CONFIG")]
    config: Option<PathBuf>,

    /// Emit JSON log lines instead of text.
    #[arg(long, global = true)]
    log_json: bool,

    /// Mirror log events to stderr.
    #[arg(long, global = true)]
    stderr: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fill missing titles and correct primary authors from each record's link.
    Enrich(EnrichArgs),
    /// Rebuild records from news posts, keeping titled entries.
    Generate(GenerateArgs),
}

#[derive(Debug, Args)]
struct EnrichArgs {
    /// Achievements JSON to update in place.
    #[arg(long)]
    achievements: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Achievements JSON to regenerate.
    #[arg(long)]
    achievements: Option<PathBuf>,

    /// Directory of Markdown news posts.
    #[arg(long)]
    news_dir: Option<PathBuf>,
}

impl Cli {
    /// Command-line flags override file and environment settings.
    fn apply(&self, cfg: &mut LabsiteConfig) {
        if self.log_json {
            cfg.log.format = LogFormat::Json;
        }
        if self.stderr {
            cfg.log.emit_stderr = true;
        }
        match &self.command {
            Command::Enrich(args) => {
                if let Some(p) = &args.achievements {
                    cfg.achievements_path = p.clone();
                }
            }
            Command::Generate(args) => {
                if let Some(p) = &args.achievements {
                    cfg.achievements_path = p.clone();
                }
                if let Some(d) = &args.news_dir {
                    cfg.news_dir = d.clone();
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins over file, flags win over both)
    let loader = match &cli.config {
        Some(path) => LabsiteConfigLoader::new().with_file(path),
        None => LabsiteConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    let mut cfg = loader.load().context("failed to load configuration")?;
    cli.apply(&mut cfg);

    init_logging(LogConfig {
        log_dir: cfg.log.dir.clone(),
        emit_stderr: cfg.log.emit_stderr,
        format: cfg.log.format,
        default_filter: cfg.log.filter.clone(),
        ..LogConfig::default()
    })?;

    match cli.command {
        Command::Enrich(_) => commands::enrich(&cfg).await,
        Command::Generate(_) => commands::generate(&cfg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "labsite",
            "--log-json",
            "generate",
            "--news-dir",
            "posts",
            "--achievements",
            "out.json",
        ]);
        let mut cfg = LabsiteConfig::default();
        cli.apply(&mut cfg);
        assert_eq!(cfg.log.format, LogFormat::Json);
        assert_eq!(cfg.news_dir, PathBuf::from("posts"));
        assert_eq!(cfg.achievements_path, PathBuf::from("out.json"));
        assert!(!cfg.log.emit_stderr);
    }

    #[test]
    fn enrich_keeps_configured_paths_without_flags() {
        let cli = Cli::parse_from(["labsite", "enrich", "--stderr"]);
        let mut cfg = LabsiteConfig::default();
        cli.apply(&mut cfg);
        assert!(cfg.log.emit_stderr);
        assert_eq!(
            cfg.achievements_path,
            PathBuf::from("src/content/achievements/temp.json")
        );
    }
}
