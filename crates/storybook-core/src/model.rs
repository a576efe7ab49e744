//! Records describing stories, their sections and practice words, plus the
//! three state slices the store owns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Opaque identifier handed out when words are loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordId(pub u32);

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryId(pub i64);

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to an audio resource, resolved against the assets directory by
/// the audio backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioRef(pub String);

impl AudioRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,
    pub text: String,
    #[serde(default)]
    pub audio: Option<AudioRef>,
    #[serde(default)]
    pub img: Option<ImageRef>,
    #[serde(default)]
    pub complete: bool,
}

impl Word {
    /// Audio to play once this word has been practiced, if it has any.
    pub fn practice_audio(&self) -> Option<&AudioRef> {
        if self.complete {
            self.audio.as_ref()
        } else {
            None
        }
    }
}

/// Where a section's word image sits over the story picture, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImagePosition {
    pub top: f32,
    pub left: f32,
}

/// One narrated word and the span of narration audio it occupies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    pub text: String,
    pub start: f32,
    pub end: f32,
}

impl WordTiming {
    pub fn contains(&self, position_secs: f32) -> bool {
        position_secs >= self.start && position_secs <= self.end
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub text: String,
    pub audio: AudioRef,
    pub word: Option<Word>,
    pub img_pos: Option<ImagePosition>,
    /// Narration of this section ends in a word-practice prompt.
    pub requires_practice: bool,
    /// Non-empty when the narration should highlight words as it plays.
    pub timings: Vec<WordTiming>,
    /// Words offered in the practice prompt; empty offers every word.
    pub choices: Vec<WordId>,
}

impl Section {
    pub fn highlights_by_timing(&self) -> bool {
        !self.timings.is_empty()
    }

    /// Index of the first timing containing `position_secs`.
    pub fn timing_at(&self, position_secs: f32) -> Option<usize> {
        self.timings
            .iter()
            .position(|timing| timing.contains(position_secs))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Story {
    pub id: StoryId,
    pub title: String,
    pub img: ImageRef,
    pub sections: Vec<Section>,
    /// `sections.len()` once every section has been read.
    pub curr_section_idx: usize,
}

impl Story {
    pub fn is_complete(&self) -> bool {
        self.curr_section_idx >= self.sections.len()
    }

    pub fn current_section(&self) -> Option<&Section> {
        self.sections.get(self.curr_section_idx)
    }

    pub fn previous_section(&self) -> Option<&Section> {
        self.curr_section_idx
            .checked_sub(1)
            .and_then(|idx| self.sections.get(idx))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoryState {
    pub stories: Vec<Arc<Story>>,
    pub curr_story: Option<StoryId>,
}

impl StoryState {
    pub fn new(stories: Vec<Story>) -> Self {
        Self {
            stories: stories.into_iter().map(Arc::new).collect(),
            curr_story: None,
        }
    }

    pub fn position_of(&self, id: StoryId) -> Option<usize> {
        self.stories.iter().position(|story| story.id == id)
    }

    pub fn story(&self, id: StoryId) -> Option<&Arc<Story>> {
        self.stories.iter().find(|story| story.id == id)
    }

    /// The current story, read through the collection so it is never stale.
    pub fn current(&self) -> Option<&Arc<Story>> {
        self.curr_story.and_then(|id| self.story(id))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WordState {
    pub words: Vec<Word>,
}

impl WordState {
    pub fn word(&self, id: WordId) -> Option<&Word> {
        self.words.iter().find(|word| word.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuizState {
    pub word: Option<Word>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RootState {
    pub story: StoryState,
    pub word: WordState,
    pub quiz: QuizState,
}
