//! Pure state transitions for the story, word and quiz slices.
//!
//! Every reducer takes the previous state by reference and returns a new one
//! together with an outcome. Failed lookups and boundary violations leave the
//! state unchanged and say why in the outcome instead of being swallowed.

use crate::action::Action;
use crate::model::{QuizState, RootState, Story, StoryId, StoryState, WordId, WordState};
use crate::store::DispatchReport;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// The action is not one this slice handles.
    Ignored,
    /// Handled, but the state already matched.
    Unchanged,
    Applied,
    /// Applied, and the story reached its final section.
    StoryCompleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReduceError {
    #[error("story {0} not found")]
    StoryNotFound(StoryId),
    #[error("word {0} not found")]
    WordNotFound(WordId),
    #[error("story {0} is already complete")]
    StoryAlreadyComplete(StoryId),
    #[error("section {idx} of story {story_id} is out of range (reached {reached} of {len})")]
    SectionOutOfRange {
        story_id: StoryId,
        idx: usize,
        reached: usize,
        len: usize,
    },
}

pub type Outcome = Result<Change, ReduceError>;

#[derive(Debug, Clone, PartialEq)]
pub struct Reduced<S> {
    pub state: S,
    pub outcome: Outcome,
}

impl<S: Clone> Reduced<S> {
    fn keep(state: &S, change: Change) -> Self {
        Self {
            state: state.clone(),
            outcome: Ok(change),
        }
    }

    fn reject(state: &S, err: ReduceError) -> Self {
        Self {
            state: state.clone(),
            outcome: Err(err),
        }
    }

    fn applied(state: S, change: Change) -> Self {
        Self {
            state,
            outcome: Ok(change),
        }
    }
}

pub fn reduce_story(state: &StoryState, action: &Action) -> Reduced<StoryState> {
    match action {
        Action::SelectStory { id } => select_story(state, *id),
        Action::MasterWord { word, story_id } => {
            advance_story(state, *story_id, |story, idx| {
                story.sections[idx].word = Some(word.clone());
            })
        }
        Action::AdvanceSection { story_id } => advance_story(state, *story_id, |_, _| {}),
        Action::ChangeCurrentSection { story_id, idx } => change_section(state, *story_id, *idx),
        _ => Reduced::keep(state, Change::Ignored),
    }
}

fn select_story(state: &StoryState, id: StoryId) -> Reduced<StoryState> {
    if state.story(id).is_none() {
        return Reduced::reject(state, ReduceError::StoryNotFound(id));
    }
    if state.curr_story == Some(id) {
        return Reduced::keep(state, Change::Unchanged);
    }
    Reduced::applied(
        StoryState {
            stories: state.stories.clone(),
            curr_story: Some(id),
        },
        Change::Applied,
    )
}

/// Moves a story one section forward after `edit` has touched the section
/// being left. The index stops at `sections.len()`, which is the complete
/// state; advancing a complete story is rejected.
fn advance_story(
    state: &StoryState,
    story_id: StoryId,
    edit: impl FnOnce(&mut Story, usize),
) -> Reduced<StoryState> {
    let Some(pos) = state.position_of(story_id) else {
        return Reduced::reject(state, ReduceError::StoryNotFound(story_id));
    };
    let current = &state.stories[pos];
    if current.is_complete() {
        return Reduced::reject(state, ReduceError::StoryAlreadyComplete(story_id));
    }

    let mut updated = Story::clone(current);
    let idx = updated.curr_section_idx;
    edit(&mut updated, idx);
    updated.curr_section_idx = idx + 1;
    let change = if updated.is_complete() {
        Change::StoryCompleted
    } else {
        Change::Applied
    };

    Reduced::applied(replace_story(state, pos, updated), change)
}

fn change_section(state: &StoryState, story_id: StoryId, idx: usize) -> Reduced<StoryState> {
    let Some(pos) = state.position_of(story_id) else {
        return Reduced::reject(state, ReduceError::StoryNotFound(story_id));
    };
    let current = &state.stories[pos];
    let len = current.sections.len();
    if idx >= len || idx > current.curr_section_idx {
        return Reduced::reject(
            state,
            ReduceError::SectionOutOfRange {
                story_id,
                idx,
                reached: current.curr_section_idx,
                len,
            },
        );
    }
    if idx == current.curr_section_idx && state.curr_story == Some(story_id) {
        return Reduced::keep(state, Change::Unchanged);
    }

    let mut updated = Story::clone(current);
    updated.curr_section_idx = idx;
    Reduced::applied(replace_story(state, pos, updated), Change::Applied)
}

/// Swaps one entry of the collection; the other entries keep their `Arc`.
fn replace_story(state: &StoryState, pos: usize, story: Story) -> StoryState {
    let id = story.id;
    let mut stories = state.stories.clone();
    stories[pos] = Arc::new(story);
    StoryState {
        stories,
        curr_story: Some(id),
    }
}

pub fn reduce_word(state: &WordState, action: &Action) -> Reduced<WordState> {
    match action {
        Action::MasterWord { word, .. } => {
            let Some(pos) = state.words.iter().position(|w| w.id == word.id) else {
                return Reduced::reject(state, ReduceError::WordNotFound(word.id));
            };
            let mut mastered = word.clone();
            mastered.complete = true;
            if state.words[pos] == mastered {
                return Reduced::keep(state, Change::Unchanged);
            }
            let mut words = state.words.clone();
            words[pos] = mastered;
            Reduced::applied(WordState { words }, Change::Applied)
        }
        _ => Reduced::keep(state, Change::Ignored),
    }
}

pub fn reduce_quiz(state: &QuizState, action: &Action) -> Reduced<QuizState> {
    match action {
        Action::SelectQuizWord { word } => Reduced::applied(
            QuizState { word: word.clone() },
            Change::Applied,
        ),
        _ => Reduced::keep(state, Change::Ignored),
    }
}

/// Runs an action through all three slices.
///
/// Mastering a word is applied to the word slice only when the story slice
/// accepted it, so a word is never marked complete for a story that did not
/// record it.
pub fn reduce_root(state: &RootState, action: &Action) -> (RootState, DispatchReport) {
    let story = reduce_story(&state.story, action);
    let word = match (action, &story.outcome) {
        (Action::MasterWord { .. }, Err(_)) => Reduced::keep(&state.word, Change::Ignored),
        _ => reduce_word(&state.word, action),
    };
    let quiz = reduce_quiz(&state.quiz, action);

    let report = DispatchReport {
        kind: action.kind().to_string(),
        story: story.outcome,
        word: word.outcome,
        quiz: quiz.outcome,
    };
    let next = RootState {
        story: story.state,
        word: word.state,
        quiz: quiz.state,
    };
    (next, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AudioRef, ImageRef, Section, Word};

    fn section(text: &str) -> Section {
        Section {
            text: text.to_string(),
            audio: AudioRef(format!("{text}.mp3")),
            word: None,
            img_pos: None,
            requires_practice: true,
            timings: Vec::new(),
            choices: Vec::new(),
        }
    }

    fn story(id: i64, sections: usize) -> Story {
        Story {
            id: StoryId(id),
            title: format!("Story {id}"),
            img: ImageRef(format!("story-{id}.png")),
            sections: (0..sections).map(|i| section(&format!("s{i}"))).collect(),
            curr_section_idx: 0,
        }
    }

    fn word(id: u32, text: &str) -> Word {
        Word {
            id: WordId(id),
            text: text.to_string(),
            audio: Some(AudioRef(format!("{text}.mp3"))),
            img: None,
            complete: false,
        }
    }

    fn stories() -> StoryState {
        StoryState::new(vec![story(1, 3), story(2, 2)])
    }

    fn words() -> WordState {
        WordState {
            words: vec![word(0, "cat"), word(1, "hat"), word(2, "bat")],
        }
    }

    #[test]
    fn unrecognized_actions_leave_every_slice_equal() {
        let root = RootState {
            story: stories(),
            word: words(),
            quiz: QuizState::default(),
        };
        let action = Action::Unrecognized {
            kind: "@@INIT".to_string(),
        };
        let (next, report) = reduce_root(&root, &action);
        assert_eq!(next, root);
        assert_eq!(report.story, Ok(Change::Ignored));
        assert_eq!(report.word, Ok(Change::Ignored));
        assert_eq!(report.quiz, Ok(Change::Ignored));
    }

    #[test]
    fn slices_ignore_actions_for_other_slices() {
        let quiz = QuizState::default();
        let reduced = reduce_quiz(&quiz, &Action::SelectStory { id: StoryId(1) });
        assert_eq!(reduced.state, quiz);
        assert_eq!(reduced.outcome, Ok(Change::Ignored));

        let state = words();
        let reduced = reduce_word(&state, &Action::AdvanceSection { story_id: StoryId(1) });
        assert_eq!(reduced.state, state);
    }

    #[test]
    fn select_story_sets_current() {
        let reduced = reduce_story(&stories(), &Action::SelectStory { id: StoryId(2) });
        assert_eq!(reduced.outcome, Ok(Change::Applied));
        assert_eq!(reduced.state.curr_story, Some(StoryId(2)));
        assert_eq!(reduced.state.current().map(|s| s.id), Some(StoryId(2)));
    }

    #[test]
    fn selecting_missing_story_keeps_unset_current() {
        let state = stories();
        let reduced = reduce_story(&state, &Action::SelectStory { id: StoryId(9) });
        assert_eq!(reduced.outcome, Err(ReduceError::StoryNotFound(StoryId(9))));
        assert_eq!(reduced.state, state);
        assert_eq!(reduced.state.curr_story, None);
    }

    #[test]
    fn selecting_missing_story_keeps_previous_current() {
        let state = reduce_story(&stories(), &Action::SelectStory { id: StoryId(1) }).state;
        let reduced = reduce_story(&state, &Action::SelectStory { id: StoryId(7) });
        assert!(reduced.outcome.is_err());
        assert_eq!(reduced.state.curr_story, Some(StoryId(1)));
        assert_eq!(reduced.state.stories, state.stories);
    }

    #[test]
    fn reselecting_current_story_is_unchanged() {
        let state = reduce_story(&stories(), &Action::SelectStory { id: StoryId(1) }).state;
        let reduced = reduce_story(&state, &Action::SelectStory { id: StoryId(1) });
        assert_eq!(reduced.outcome, Ok(Change::Unchanged));
    }

    #[test]
    fn mastering_word_advances_one_section() {
        let state = stories();
        let mastered = word(1, "hat");
        let reduced = reduce_story(
            &state,
            &Action::MasterWord {
                word: mastered.clone(),
                story_id: StoryId(1),
            },
        );
        assert_eq!(reduced.outcome, Ok(Change::Applied));

        let updated = reduced.state.story(StoryId(1)).unwrap();
        assert_eq!(updated.curr_section_idx, 1);
        assert_eq!(updated.sections[0].word, Some(mastered));
        assert_eq!(updated.sections[1], state.stories[0].sections[1]);
        assert_eq!(updated.sections[2], state.stories[0].sections[2]);
        assert_eq!(reduced.state.curr_story, Some(StoryId(1)));
        assert_eq!(reduced.state.current().unwrap().curr_section_idx, 1);

        assert!(!Arc::ptr_eq(&reduced.state.stories[0], &state.stories[0]));
        assert!(Arc::ptr_eq(&reduced.state.stories[1], &state.stories[1]));
        assert_eq!(state.stories[0].curr_section_idx, 0);
    }

    #[test]
    fn mastering_for_missing_story_is_not_found() {
        let state = stories();
        let reduced = reduce_story(
            &state,
            &Action::MasterWord {
                word: word(0, "cat"),
                story_id: StoryId(5),
            },
        );
        assert_eq!(reduced.outcome, Err(ReduceError::StoryNotFound(StoryId(5))));
        assert_eq!(reduced.state, state);
    }

    #[test]
    fn mastering_last_section_completes_and_stops_at_length() {
        let mut state = stories();
        let master = Action::MasterWord {
            word: word(2, "bat"),
            story_id: StoryId(2),
        };

        let first = reduce_story(&state, &master);
        assert_eq!(first.outcome, Ok(Change::Applied));
        state = first.state;

        let second = reduce_story(&state, &master);
        assert_eq!(second.outcome, Ok(Change::StoryCompleted));
        state = second.state;
        let finished = state.story(StoryId(2)).unwrap();
        assert_eq!(finished.curr_section_idx, finished.sections.len());
        assert!(finished.is_complete());

        let overrun = reduce_story(&state, &master);
        assert_eq!(
            overrun.outcome,
            Err(ReduceError::StoryAlreadyComplete(StoryId(2)))
        );
        let after = overrun.state.story(StoryId(2)).unwrap();
        assert_eq!(after.curr_section_idx, after.sections.len());
        assert_eq!(overrun.state, state);
    }

    #[test]
    fn advance_section_leaves_word_slot_empty() {
        let reduced = reduce_story(
            &stories(),
            &Action::AdvanceSection {
                story_id: StoryId(1),
            },
        );
        let updated = reduced.state.story(StoryId(1)).unwrap();
        assert_eq!(updated.curr_section_idx, 1);
        assert!(updated.sections[0].word.is_none());
    }

    #[test]
    fn change_section_rewinds_to_reached_section() {
        let mut state = stories();
        for _ in 0..2 {
            state = reduce_story(
                &state,
                &Action::AdvanceSection {
                    story_id: StoryId(1),
                },
            )
            .state;
        }
        let reduced = reduce_story(
            &state,
            &Action::ChangeCurrentSection {
                story_id: StoryId(1),
                idx: 0,
            },
        );
        assert_eq!(reduced.outcome, Ok(Change::Applied));
        assert_eq!(reduced.state.story(StoryId(1)).unwrap().curr_section_idx, 0);
    }

    #[test]
    fn change_section_rejects_unreached_section() {
        let state = stories();
        let reduced = reduce_story(
            &state,
            &Action::ChangeCurrentSection {
                story_id: StoryId(1),
                idx: 2,
            },
        );
        assert_eq!(
            reduced.outcome,
            Err(ReduceError::SectionOutOfRange {
                story_id: StoryId(1),
                idx: 2,
                reached: 0,
                len: 3,
            })
        );
        assert_eq!(reduced.state, state);
    }

    #[test]
    fn mastering_word_completes_exactly_one_entry() {
        let state = words();
        let reduced = reduce_word(
            &state,
            &Action::MasterWord {
                word: word(1, "hat"),
                story_id: StoryId(1),
            },
        );
        assert_eq!(reduced.outcome, Ok(Change::Applied));
        let completed: Vec<_> = reduced
            .state
            .words
            .iter()
            .filter(|w| w.complete)
            .map(|w| w.text.as_str())
            .collect();
        assert_eq!(completed, vec!["hat"]);
        assert_eq!(reduced.state.words[0], state.words[0]);
        assert_eq!(reduced.state.words[2], state.words[2]);
    }

    #[test]
    fn mastering_unknown_word_is_not_found() {
        let state = words();
        let reduced = reduce_word(
            &state,
            &Action::MasterWord {
                word: word(42, "hat"),
                story_id: StoryId(1),
            },
        );
        assert_eq!(reduced.outcome, Err(ReduceError::WordNotFound(WordId(42))));
        assert_eq!(reduced.state, state);
    }

    #[test]
    fn quiz_word_is_replaced_unconditionally() {
        let state = QuizState {
            word: Some(word(0, "cat")),
        };
        let reduced = reduce_quiz(
            &state,
            &Action::SelectQuizWord {
                word: Some(word(1, "hat")),
            },
        );
        assert_eq!(reduced.state.word.map(|w| w.text), Some("hat".to_string()));

        let cleared = reduce_quiz(&state, &Action::SelectQuizWord { word: None });
        assert_eq!(cleared.state.word, None);
    }

    #[test]
    fn word_slice_skips_mastery_when_story_rejects_it() {
        let root = RootState {
            story: stories(),
            word: words(),
            quiz: QuizState::default(),
        };
        let (next, report) = reduce_root(
            &root,
            &Action::MasterWord {
                word: word(0, "cat"),
                story_id: StoryId(99),
            },
        );
        assert!(report.story.is_err());
        assert_eq!(report.word, Ok(Change::Ignored));
        assert_eq!(next, root);
    }
}
