//! Entry point for the storybook reader.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse command-line arguments.
//! - Load user configuration from `conf/config.toml`.
//! - Load the story library.
//! - Launch the GUI on the requested story, or replay an action script.

mod app;
mod audio;
mod config;
mod library;

use crate::app::run_app;
use crate::config::{AppConfig, load_config};
use crate::library::load_library;
use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use storybook_core::{Action, RawAction, StoryId, Store};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

static SIGINT_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Returns true once per Ctrl-C received.
pub(crate) fn take_sigint_requested() -> bool {
    SIGINT_REQUESTED.swap(false, Ordering::SeqCst)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Read(Option<StoryId>),
    Replay(PathBuf),
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let mode = parse_args(env::args().skip(1))?;
    let config = load_config(Path::new("conf/config.toml"));
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(level = %config.log_level, ?mode, "Starting storybook reader");

    let state = load_library(Path::new(&config.stories_path))?;
    match mode {
        Mode::Read(story) => {
            let story = story.unwrap_or(StoryId(config.default_story_id));
            install_sigint_handler();
            run_app(Store::new(state), config, story).context("Failed to start the GUI")?;
        }
        Mode::Replay(path) => replay(Store::new(state), &path, &config)?,
    }
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Mode> {
    let usage = || anyhow!("Usage: storybook [story-id] | storybook --replay <actions.json>");
    match args.next() {
        None => Ok(Mode::Read(None)),
        Some(flag) if flag == "--replay" => {
            let path = args.next().ok_or_else(usage)?;
            Ok(Mode::Replay(PathBuf::from(path)))
        }
        Some(id) => {
            let id = id
                .parse::<i64>()
                .map_err(|_| anyhow!("Story id must be a number, got `{id}`"))?;
            if args.next().is_some() {
                return Err(usage());
            }
            Ok(Mode::Read(Some(StoryId(id))))
        }
    }
}

#[derive(Debug, Serialize)]
struct ReplaySummary {
    dispatched: u64,
    rejected: usize,
    stories: Vec<StoryProgress>,
    mastered: Vec<String>,
}

#[derive(Debug, Serialize)]
struct StoryProgress {
    id: i64,
    title: String,
    section: usize,
    sections: usize,
    complete: bool,
}

/// Dispatch a JSON action script against the library without opening a
/// window and print the resulting progress as JSON.
fn replay(mut store: Store, path: &Path, config: &AppConfig) -> Result<()> {
    let script = std::fs::read_to_string(path)
        .with_context(|| format!("Reading action script {}", path.display()))?;
    let actions: Vec<Action> = RawAction::parse_script(&script)
        .with_context(|| format!("Parsing action script {}", path.display()))?;
    info!(
        count = actions.len(),
        stories = %config.stories_path,
        "Replaying actions"
    );

    let rejected = actions
        .into_iter()
        .map(|action| store.dispatch(action))
        .filter(|report| !report.is_ok())
        .count();

    let summary = replay_summary(&store, rejected);
    info!(
        dispatched = summary.dispatched,
        rejected,
        mastered = summary.mastered.len(),
        "Replay finished"
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("Serializing replay summary")?
    );
    Ok(())
}

fn replay_summary(store: &Store, rejected: usize) -> ReplaySummary {
    let state = store.state();
    ReplaySummary {
        dispatched: store.dispatched(),
        rejected,
        stories: state
            .story
            .stories
            .iter()
            .map(|story| StoryProgress {
                id: story.id.0,
                title: story.title.clone(),
                section: story.curr_section_idx,
                sections: story.sections.len(),
                complete: story.is_complete(),
            })
            .collect(),
        mastered: state
            .word
            .words
            .iter()
            .filter(|word| word.complete)
            .map(|word| word.text.clone())
            .collect(),
    }
}

fn install_sigint_handler() {
    if let Err(err) = ctrlc::set_handler(|| SIGINT_REQUESTED.store(true, Ordering::SeqCst)) {
        warn!("Failed to install Ctrl-C handler: {err}");
    }
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    if env::var_os("RUST_LOG").is_some() {
        info!("RUST_LOG is set; ignoring config log level");
        return;
    }
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
