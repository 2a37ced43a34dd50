use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::{
    path::{Path, PathBuf},
    rc::Rc,
};

use crate::config::Config;
use crate::domain::{
    bcp47::is_valid_language_tag,
    context::{ConsoleBuffer, HostContext},
    identity::{IdentityRegistry, TrackId, UniqueId},
    list::{ListId, ListRegistry, TrackList},
    root::OpaqueRoot,
    track::TrackType,
};

const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Parser)]
#[command(name = "tracktag")]
#[command(version = "0.1")]
#[command(about = "Track identity and BCP 47 language tag checks")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long, default_value = "tracks.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether language tags are well-formed BCP 47
    Validate {
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Show tracks of every configured list
    Show {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
        /// Only show lists of this track type (audio, video or text)
        #[arg(short = 't', long = "type")]
        track_type: Option<TrackType>,
    },
    /// Change the language of a configured track
    Retag {
        /// Name of the list holding the track
        #[arg(short, long)]
        list: String,
        /// Public id of the track
        #[arg(short, long)]
        id: String,
        language: String,
    },
}

/// One line of `show` output
#[derive(Debug, Serialize)]
pub struct TrackSummary {
    pub list: String,
    pub unique_id: UniqueId,
    pub id: String,
    pub track_id: TrackId,
    pub track_type: TrackType,
    pub kind: String,
    pub label: String,
    pub language: String,
    pub valid_language: String,
    pub owner: Option<ListId>,
    pub root: OpaqueRoot,
}

fn shown(list: &TrackList, track_type: Option<TrackType>) -> bool {
    track_type.is_none_or(|track_type| list.track_type() == track_type)
}

pub fn summarize(lists: &ListRegistry, track_type: Option<TrackType>) -> Vec<TrackSummary> {
    lists
        .iter()
        .filter(|list| shown(list, track_type))
        .flat_map(|list| {
            list.iter().map(move |media| {
                let track = media.track();
                TrackSummary {
                    list: list.name().to_string(),
                    unique_id: track.unique_id(),
                    id: track.id().to_string(),
                    track_id: track.track_id(),
                    track_type: track.track_type(),
                    kind: media.kind().to_string(),
                    label: track.label().to_string(),
                    language: track.language().to_string(),
                    valid_language: track.valid_bcp47_language().to_string(),
                    owner: track.track_list(),
                    root: track.opaque_root(lists),
                }
            })
        })
        .collect()
}

fn init_logging(level: Option<&str>) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level.unwrap_or(DEFAULT_LOG_LEVEL)),
    )
    .init();
}

fn load(path: &Path) -> anyhow::Result<Config> {
    let cfg = Config::load(path)?;
    init_logging(cfg.logging.level.as_deref());
    Ok(cfg)
}

fn print_language(language: &str, valid_language: &str) {
    if language.is_empty() {
        println!("    language: none");
    } else if valid_language.is_empty() {
        println!("    language: {language:?} (not a valid BCP 47 tag)");
    } else {
        println!("    language: {language}");
    }
}

/// Entrypoint for CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Validate { tags } => {
            init_logging(None);
            for tag in tags {
                let verdict = if is_valid_language_tag(tag) {
                    "valid"
                } else {
                    "invalid"
                };
                println!("{tag:?}: {verdict}");
            }
        }

        Commands::Show { json, track_type } => {
            let cfg = load(&cli.config)?;
            let lists = cfg.build_lists(IdentityRegistry::global(), None)?;
            let summaries = summarize(&lists, *track_type);

            if *json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
                return Ok(());
            }

            for list in lists.iter().filter(|list| shown(list, *track_type)) {
                println!(
                    "List '{}' ({}, {} tracks)",
                    list.name(),
                    list.track_type(),
                    list.len()
                );
                for summary in summaries.iter().filter(|s| s.list == list.name()) {
                    println!(
                        "  {} id={} kind={} label={:?}",
                        summary.unique_id,
                        summary.id,
                        if summary.kind.is_empty() {
                            "-"
                        } else {
                            summary.kind.as_str()
                        },
                        summary.label
                    );
                    print_language(&summary.language, &summary.valid_language);
                    println!("    root: {}", summary.root);
                }
            }
        }

        Commands::Retag { list, id, language } => {
            let cfg = load(&cli.config)?;
            let console = Rc::new(ConsoleBuffer::default());
            let context: Rc<dyn HostContext> = console.clone();

            let mut lists = cfg.build_lists(IdentityRegistry::global(), Some(&context))?;
            let holder = lists
                .find(list)
                .with_context(|| format!("list '{list}' not found"))?;
            let list_id = holder.id();
            let unique_id = holder
                .find_by_id(id)
                .ok_or_else(|| anyhow!("track '{id}' not found in list '{list}'"))?
                .track()
                .unique_id();

            lists.set_language(list_id, unique_id, language)?;
            let track = lists.track(list_id, unique_id)?.track();

            println!("Track {} ({id})", track.unique_id());
            print_language(track.language(), track.valid_bcp47_language());
            for diagnostic in console.take_messages() {
                println!(
                    "[{}] {:?}: {}",
                    diagnostic.emitted_at.format("%H:%M:%S"),
                    diagnostic.severity,
                    diagnostic.message
                );
            }
        }
    }

    Ok(())
}
