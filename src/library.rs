//! Resolves the story seed the reader starts from.

use anyhow::{Context, Result};
use std::path::Path;
use storybook_core::{RootState, Seed, load_seed, parse_seed};
use tracing::{info, warn};

const BUILTIN_SEED: &str = include_str!("../assets/stories.json");

/// Load the configured seed. A missing file falls back to the stories built
/// into the binary; a present but invalid file is an error.
pub fn load_library(path: &Path) -> Result<RootState> {
    let seed = if path.exists() {
        load_seed(path).with_context(|| format!("Loading stories from {}", path.display()))?
    } else {
        warn!(path = %path.display(), "Story file not found; using built-in stories");
        builtin_seed()?
    };
    info!(
        stories = seed.stories.len(),
        words = seed.words.len(),
        "Story library ready"
    );
    Ok(seed.into_root_state())
}

fn builtin_seed() -> Result<Seed> {
    parse_seed(BUILTIN_SEED).context("Parsing built-in stories")
}
