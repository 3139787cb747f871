//! Roadmap command line
//!
//! Subcommands:
//! - `validate <prompt>`: check a topic prompt
//! - `layout --total N`: print node positions for an N-node roadmap
//! - `repair <file>`: repair a raw service response saved to disk
//! - `generate <prompt>`: call the generation service and print the roadmap
//!
//! Results go to stdout as JSON; logs go to stderr.

#![allow(missing_docs)]

use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use roadmap_core::prelude::*;
use roadmap_core::{layout, repair, validate_prompt};
use roadmap_llm::{ClientConfig, CompletionClient, OpenAiClient};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Command definition
#[must_use]
pub fn command() -> Command {
    Command::new("roadmap")
        .version(roadmap_core::VERSION)
        .about("Generate structured learning roadmaps")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand(
            Command::new("validate")
                .about("Check a topic prompt without calling the service")
                .arg(Arg::new("prompt").required(true).help("Topic to learn")),
        )
        .subcommand(
            Command::new("layout")
                .about("Print node positions for a roadmap of the given size")
                .arg(
                    Arg::new("total")
                        .long("total")
                        .required(true)
                        .value_parser(value_parser!(usize))
                        .help("Number of nodes"),
                ),
        )
        .subcommand(
            Command::new("repair")
                .about("Repair a raw generation response read from a file")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("File holding the raw response text"),
                ),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate a roadmap through the generation service")
                .arg(Arg::new("prompt").required(true).help("Topic to learn"))
                .arg(
                    Arg::new("level")
                        .long("level")
                        .default_value("beginner")
                        .value_parser(|s: &str| s.parse::<Level>())
                        .help("beginner, intermediate or advanced"),
                )
                .arg(
                    Arg::new("style")
                        .long("style")
                        .default_value("week-by-week")
                        .value_parser(|s: &str| s.parse::<Style>())
                        .help("week-by-week or topic-wise"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML generator configuration"),
                )
                .arg(
                    Arg::new("dev")
                        .long("dev")
                        .action(ArgAction::SetTrue)
                        .help("Development mode: placeholder roadmap when the service fails"),
                ),
        )
}

/// Run a parsed command line against the real generation service
///
/// # Errors
/// Rejected input, unreadable files, or a failed generation.
pub async fn run(matches: &ArgMatches, out: &mut dyn Write) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("generate", args)) => {
            check_prompt(&required::<String>(args, "prompt")?)?;
            let config = generator_config(args)?;
            let client = ClientConfig::from_env()
                .map(|c| c.with_timeout(config.request_timeout()))
                .and_then(OpenAiClient::new)
                .map_err(RoadmapError::from)
                .map_err(|err| anyhow::anyhow!("{}: {err}", err.user_message()))?;
            generate(args, config, Arc::new(client), out).await
        }
        Some((name, args)) => run_offline(name, args, out),
        None => bail!("no subcommand given"),
    }
}

/// Subcommands that never touch the network
///
/// # Errors
/// Rejected prompt or unusable repair input.
pub fn run_offline(name: &str, args: &ArgMatches, out: &mut dyn Write) -> anyhow::Result<()> {
    match name {
        "validate" => {
            check_prompt(&required::<String>(args, "prompt")?)?;
            writeln!(out, "ok")?;
        }
        "layout" => {
            let total = required::<usize>(args, "total")?;
            let positions: Vec<Position> =
                (0..total).map(|index| layout::position(index, total)).collect();
            writeln!(out, "{}", serde_json::to_string_pretty(&positions)?)?;
        }
        "repair" => {
            let path = required::<PathBuf>(args, "file")?;
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let nodes = repair(&raw).map_err(|err| anyhow::anyhow!("{}: {err}", err.user_message()))?;
            writeln!(out, "{}", serde_json::to_string_pretty(&nodes)?)?;
        }
        other => bail!("unknown subcommand: {other}"),
    }
    Ok(())
}

/// `generate` against any completion client
///
/// # Errors
/// The generation error, prefixed with its user-facing message.
pub async fn generate(
    args: &ArgMatches,
    config: GeneratorConfig,
    client: Arc<dyn CompletionClient>,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let prompt = required::<String>(args, "prompt")?;
    let level = required::<Level>(args, "level")?;
    let style = required::<Style>(args, "style")?;

    let roadmap = RoadmapGenerator::new(client, config)
        .generate_roadmap(&prompt, level, style)
        .await
        .map_err(|err| anyhow::anyhow!("{}: {err}", err.user_message()))?;
    writeln!(out, "{}", serde_json::to_string_pretty(&roadmap)?)?;
    Ok(())
}

/// Generator configuration from `--config`, `--dev` and `ROADMAP_MODE`
///
/// # Errors
/// Unreadable or invalid configuration file.
pub fn generator_config(args: &ArgMatches) -> anyhow::Result<GeneratorConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => GeneratorConfig::new().with_mode(RunMode::from_env()),
    };
    if args.get_flag("dev") {
        config = config.with_mode(RunMode::Development);
    }
    Ok(config)
}

/// Reject a prompt with its user-facing message
///
/// # Errors
/// The prompt fails validation.
pub fn check_prompt(prompt: &str) -> anyhow::Result<()> {
    validate_prompt(prompt).map_err(|rejection| {
        let err = RoadmapError::from(rejection);
        anyhow::anyhow!("{}: {err}", err.user_message())
    })
}

fn required<T: Clone + Send + Sync + 'static>(args: &ArgMatches, id: &str) -> anyhow::Result<T> {
    args.get_one::<T>(id)
        .cloned()
        .with_context(|| format!("missing argument: {id}"))
}
