//! Core of the storybook reader.
//!
//! Everything with behaviour lives here so it can be exercised without a
//! window or an audio device:
//! - `model`: stories, sections, words and the three state slices.
//! - `action` / `reducer` / `store`: the centralized state and its pure
//!   transitions.
//! - `controller`: the page-level narration / word-practice state machine.
//! - `audio`: the scoped playback channel the controller's commands run on.
//! - `view`: the view model handed to whatever renders the page.
//! - `seed`: startup data loading.

pub mod action;
pub mod audio;
pub mod controller;
pub mod model;
pub mod reducer;
pub mod seed;
pub mod store;
pub mod view;

#[cfg(test)]
mod fixtures;

pub use action::{Action, ActionError, RawAction};
pub use audio::{AudioBackend, AudioChannel, AudioNotice, PlaybackHandle, PlaybackKind};
pub use controller::{Command, ControllerOptions, Event, Phase, StoryController};
pub use model::{
    AudioRef, ImagePosition, ImageRef, QuizState, RootState, Section, Story, StoryId, StoryState,
    Word, WordId, WordState, WordTiming,
};
pub use reducer::{Change, ReduceError, Reduced};
pub use seed::{Seed, SeedError, load_seed, parse_seed};
pub use store::{DispatchReport, Store};
pub use view::{PageView, page_view};
