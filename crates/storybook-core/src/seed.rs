//! Startup data: stories and practice words loaded from JSON.
//!
//! Words are referenced by text in the file and get their `WordId` here, in
//! file order. Word text must be unique so those references are unambiguous.

use crate::model::{
    AudioRef, ImagePosition, ImageRef, QuizState, RootState, Section, Story, StoryId,
    StoryState, Word, WordId, WordState, WordTiming,
};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid seed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("word `{0}` is listed more than once")]
    DuplicateWord(String),
    #[error("story id {0} is used more than once")]
    DuplicateStory(StoryId),
    #[error("story {story_id} section {section} offers unknown word `{word}`")]
    UnknownChoice {
        story_id: StoryId,
        section: usize,
        word: String,
    },
    #[error("story {story_id} section {section} has an invalid timing for `{word}`")]
    InvalidTiming {
        story_id: StoryId,
        section: usize,
        word: String,
    },
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    words: Vec<SeedWord>,
    #[serde(default)]
    stories: Vec<SeedStory>,
}

#[derive(Debug, Deserialize)]
struct SeedWord {
    text: String,
    #[serde(default)]
    audio: Option<String>,
    #[serde(default)]
    img: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeedStory {
    id: i64,
    title: String,
    img: String,
    #[serde(default)]
    sections: Vec<SeedSection>,
}

#[derive(Debug, Deserialize)]
struct SeedSection {
    text: String,
    audio: String,
    #[serde(default = "default_requires_practice")]
    requires_practice: bool,
    #[serde(default)]
    img_pos: Option<ImagePosition>,
    #[serde(default)]
    timings: Vec<WordTiming>,
    #[serde(default)]
    choices: Vec<String>,
}

fn default_requires_practice() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq)]
pub struct Seed {
    pub stories: Vec<Story>,
    pub words: Vec<Word>,
}

impl Seed {
    pub fn into_root_state(self) -> RootState {
        RootState {
            story: StoryState::new(self.stories),
            word: WordState { words: self.words },
            quiz: QuizState::default(),
        }
    }
}

pub fn load_seed(path: &Path) -> Result<Seed, SeedError> {
    let contents = fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let seed = parse_seed(&contents)?;
    info!(
        path = %path.display(),
        stories = seed.stories.len(),
        words = seed.words.len(),
        "Loaded story seed"
    );
    Ok(seed)
}

pub fn parse_seed(json: &str) -> Result<Seed, SeedError> {
    let file: SeedFile = serde_json::from_str(json)?;

    let mut by_text: HashMap<String, WordId> = HashMap::new();
    let mut words = Vec::with_capacity(file.words.len());
    for (idx, raw) in file.words.into_iter().enumerate() {
        let id = WordId(idx as u32);
        if by_text.insert(word_key(&raw.text), id).is_some() {
            return Err(SeedError::DuplicateWord(raw.text));
        }
        words.push(Word {
            id,
            text: raw.text,
            audio: raw.audio.filter(|a| !a.is_empty()).map(AudioRef),
            img: raw.img.filter(|i| !i.is_empty()).map(ImageRef),
            complete: false,
        });
    }

    let mut seen_stories = HashSet::new();
    let mut stories = Vec::with_capacity(file.stories.len());
    for raw in file.stories {
        let story_id = StoryId(raw.id);
        if !seen_stories.insert(story_id) {
            return Err(SeedError::DuplicateStory(story_id));
        }
        let sections = raw
            .sections
            .into_iter()
            .enumerate()
            .map(|(idx, section)| build_section(story_id, idx, section, &by_text))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(story_id = %story_id, sections = sections.len(), "Seeded story");
        stories.push(Story {
            id: story_id,
            title: raw.title,
            img: ImageRef(raw.img),
            sections,
            curr_section_idx: 0,
        });
    }

    Ok(Seed { stories, words })
}

fn word_key(text: &str) -> String {
    text.trim().to_lowercase()
}

fn build_section(
    story_id: StoryId,
    idx: usize,
    raw: SeedSection,
    by_text: &HashMap<String, WordId>,
) -> Result<Section, SeedError> {
    if let Some(bad) = raw
        .timings
        .iter()
        .find(|t| !t.start.is_finite() || !t.end.is_finite() || t.end < t.start)
    {
        return Err(SeedError::InvalidTiming {
            story_id,
            section: idx,
            word: bad.text.clone(),
        });
    }
    let choices = raw
        .choices
        .into_iter()
        .map(|text| {
            by_text
                .get(&word_key(&text))
                .copied()
                .ok_or(SeedError::UnknownChoice {
                    story_id,
                    section: idx,
                    word: text,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Section {
        text: raw.text,
        audio: AudioRef(raw.audio),
        word: None,
        img_pos: raw.img_pos,
        requires_practice: raw.requires_practice,
        timings: raw.timings,
        choices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"{
        "words": [
            {"text": "cat", "audio": "words/cat.mp3", "img": "words/cat.png"},
            {"text": "hat", "audio": ""}
        ],
        "stories": [
            {
                "id": 1,
                "title": "The Cat",
                "img": "story-1/cover.png",
                "sections": [
                    {
                        "text": "The little",
                        "audio": "story-1/0.mp3",
                        "img_pos": {"top": 10, "left": 20},
                        "timings": [{"text": "The", "start": 0.0, "end": 0.4}],
                        "choices": ["Cat", "hat"]
                    },
                    {"text": "The end.", "audio": "story-1/1.mp3", "requires_practice": false}
                ]
            }
        ]
    }"#;

    #[test]
    fn parses_and_assigns_word_ids_in_order() {
        let seed = parse_seed(SEED).unwrap();
        assert_eq!(seed.words[0].id, WordId(0));
        assert_eq!(seed.words[1].id, WordId(1));
        assert!(seed.words[1].audio.is_none());
        assert!(seed.words[1].img.is_none());

        let story = &seed.stories[0];
        assert_eq!(story.curr_section_idx, 0);
        assert_eq!(story.sections[0].choices, vec![WordId(0), WordId(1)]);
        assert!(story.sections[0].requires_practice);
        assert!(!story.sections[1].requires_practice);
        assert_eq!(
            story.sections[0].img_pos,
            Some(ImagePosition {
                top: 10.0,
                left: 20.0
            })
        );
    }

    #[test]
    fn root_state_starts_without_current_story() {
        let state = parse_seed(SEED).unwrap().into_root_state();
        assert_eq!(state.story.curr_story, None);
        assert_eq!(state.word.words.len(), 2);
        assert_eq!(state.quiz.word, None);
    }

    #[test]
    fn duplicate_word_text_is_rejected() {
        let json = r#"{"words": [{"text": "cat"}, {"text": " Cat "}]}"#;
        assert!(matches!(
            parse_seed(json),
            Err(SeedError::DuplicateWord(text)) if text == " Cat "
        ));
    }

    #[test]
    fn unknown_choice_is_rejected() {
        let json = r#"{
            "words": [{"text": "cat"}],
            "stories": [{"id": 3, "title": "t", "img": "i",
                "sections": [{"text": "a", "audio": "a.mp3", "choices": ["dog"]}]}]
        }"#;
        assert!(matches!(
            parse_seed(json),
            Err(SeedError::UnknownChoice { story_id: StoryId(3), section: 0, .. })
        ));
    }

    #[test]
    fn duplicate_story_id_is_rejected() {
        let json = r#"{"stories": [
            {"id": 1, "title": "a", "img": "a"},
            {"id": 1, "title": "b", "img": "b"}
        ]}"#;
        assert!(matches!(
            parse_seed(json),
            Err(SeedError::DuplicateStory(StoryId(1)))
        ));
    }

    #[test]
    fn backwards_timing_is_rejected() {
        let json = r#"{"stories": [{"id": 1, "title": "a", "img": "a", "sections": [
            {"text": "a", "audio": "a.mp3", "timings": [{"text": "a", "start": 2.0, "end": 1.0}]}
        ]}]}"#;
        assert!(matches!(
            parse_seed(json),
            Err(SeedError::InvalidTiming { .. })
        ));
    }

    #[test]
    fn nan_timing_is_rejected() {
        let section = SeedSection {
            text: "a".to_string(),
            audio: "a.mp3".to_string(),
            requires_practice: true,
            img_pos: None,
            timings: vec![WordTiming {
                text: "a".to_string(),
                start: f32::NAN,
                end: 1.0,
            }],
            choices: Vec::new(),
        };
        assert!(matches!(
            build_section(StoryId(1), 0, section, &HashMap::new()),
            Err(SeedError::InvalidTiming { section: 0, .. })
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_seed(Path::new("does/not/exist.json")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
