//! View model handed to the presentation layer.
//!
//! Nothing here decides behaviour; it only flattens the store and the page
//! session into what a renderer needs: text spans, word slots, image
//! overlays and the practice prompt.

use crate::controller::{Phase, StoryController};
use crate::model::{ImageRef, Story, StoryId, WordId};

pub const EMPTY_SLOT: &str = "_____";

#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
    /// No story is open; `requested` is set when the route named a missing one.
    NoStory {
        requested: Option<StoryId>,
        stories: Vec<StoryCard>,
    },
    Story(StoryView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoryCard {
    pub id: StoryId,
    pub title: String,
    pub img: ImageRef,
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoryView {
    pub id: StoryId,
    pub title: String,
    pub img: ImageRef,
    pub spans: Vec<TextSpan>,
    pub overlays: Vec<ImageOverlay>,
    pub modal: Option<PracticeModal>,
    pub narrating: bool,
    pub finished: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextSpan {
    Text(String),
    /// A word of a section narrated with timings.
    TimedWord { text: String, highlighted: bool },
    Slot {
        section: usize,
        label: String,
        filled: bool,
        clickable: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageOverlay {
    pub img: ImageRef,
    pub alt: String,
    pub top: f32,
    pub left: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PracticeModal {
    pub section: usize,
    pub choices: Vec<ChoiceView>,
    pub selected: Option<WordId>,
}

impl PracticeModal {
    pub fn can_confirm(&self) -> bool {
        self.selected.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceView {
    pub id: WordId,
    pub text: String,
    pub img: Option<ImageRef>,
    pub complete: bool,
}

pub fn page_view(controller: &StoryController) -> PageView {
    let session = controller.session();
    let story = match (session.phase, controller.current_story()) {
        (Phase::NoStory { requested }, _) => {
            return PageView::NoStory {
                requested: Some(requested),
                stories: story_cards(controller),
            };
        }
        (_, None) => {
            return PageView::NoStory {
                requested: None,
                stories: story_cards(controller),
            };
        }
        (_, Some(story)) => story,
    };

    PageView::Story(StoryView {
        id: story.id,
        title: story.title.clone(),
        img: story.img.clone(),
        spans: text_spans(story, session.highlighted),
        overlays: image_overlays(story),
        modal: practice_modal(controller),
        narrating: matches!(session.phase, Phase::PlayingNarration { .. }),
        finished: matches!(session.phase, Phase::Finished) || story.is_complete(),
        error: session.last_error.as_ref().map(ToString::to_string),
    })
}

/// Every story in the library, in seed order.
pub fn story_cards(controller: &StoryController) -> Vec<StoryCard> {
    controller
        .store()
        .state()
        .story
        .stories
        .iter()
        .map(|story| StoryCard {
            id: story.id,
            title: story.title.clone(),
            img: story.img.clone(),
            complete: story.is_complete(),
        })
        .collect()
}

/// Sections up to and including the current one. The current section is
/// split into its timed words when it has timings.
fn text_spans(story: &Story, highlighted: Option<usize>) -> Vec<TextSpan> {
    let mut spans = Vec::new();
    for (idx, section) in story.sections.iter().enumerate() {
        if idx > story.curr_section_idx {
            break;
        }
        if idx == story.curr_section_idx && section.highlights_by_timing() {
            spans.extend(
                section
                    .timings
                    .iter()
                    .enumerate()
                    .map(|(word_idx, timing)| TextSpan::TimedWord {
                        text: timing.text.clone(),
                        highlighted: highlighted == Some(word_idx),
                    }),
            );
        } else {
            spans.push(TextSpan::Text(section.text.clone()));
        }
        spans.push(TextSpan::Slot {
            section: idx,
            label: section
                .word
                .as_ref()
                .map(|word| word.text.clone())
                .unwrap_or_else(|| EMPTY_SLOT.to_string()),
            filled: section.word.is_some(),
            clickable: section.requires_practice,
        });
    }
    spans
}

fn image_overlays(story: &Story) -> Vec<ImageOverlay> {
    story
        .sections
        .iter()
        .filter_map(|section| {
            let word = section.word.as_ref()?;
            let img = word.img.clone()?;
            let pos = section.img_pos?;
            Some(ImageOverlay {
                img,
                alt: word.text.clone(),
                top: pos.top,
                left: pos.left,
            })
        })
        .collect()
}

fn practice_modal(controller: &StoryController) -> Option<PracticeModal> {
    let session = controller.session();
    if !session.show_modal {
        return None;
    }
    let Phase::AwaitingWordChoice { section } = session.phase else {
        return None;
    };
    let state = controller.store().state();
    let choices = controller
        .choices()
        .into_iter()
        .filter_map(|id| state.word.word(id))
        .map(|word| ChoiceView {
            id: word.id,
            text: word.text.clone(),
            img: word.img.clone(),
            complete: word.complete,
        })
        .collect();
    Some(PracticeModal {
        section,
        choices,
        selected: state.quiz.word.as_ref().map(|word| word.id),
    })
}
