//! Page-level state machine sequencing narration and word practice.
//!
//! The controller owns the store and the ephemeral session of one story page.
//! Events come from the user and from audio notifications; the controller
//! dispatches actions, re-derives its phase from the updated story and returns
//! the audio commands the shell has to run. Every playback it asks for carries
//! a fresh generation, and notifications for any other generation are dropped.

use crate::action::Action;
use crate::audio::{AudioNotice, PlaybackKind};
use crate::model::{AudioRef, Story, StoryId, Word, WordId};
use crate::reducer::ReduceError;
use crate::store::Store;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerOptions {
    /// When a story finishes, open the next unfinished one instead of stopping.
    pub continue_to_next_story: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// The requested story does not exist.
    NoStory { requested: StoryId },
    PlayingNarration { section: usize },
    AwaitingWordChoice { section: usize },
    PlayingWordAudio { word: WordId },
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Mounted { story_id: StoryId },
    StoryPicked { story_id: StoryId },
    NarrationPosition { generation: u64, position: Duration },
    NarrationEnded { generation: u64 },
    WordAudioEnded { generation: u64 },
    /// The shell could not start the playback with this generation.
    AudioFailed { generation: u64 },
    SlotClicked { section: usize },
    QuizWordPicked { word: WordId },
    WordConfirmed,
    ModalDismissed,
    PlayRequested,
    Unmounted,
}

impl Event {
    pub fn from_notice(notice: AudioNotice) -> Option<Event> {
        match notice {
            AudioNotice::Position {
                kind: PlaybackKind::Narration,
                generation,
                position,
            } => Some(Event::NarrationPosition {
                generation,
                position,
            }),
            AudioNotice::Position { .. } => None,
            AudioNotice::Ended {
                kind: PlaybackKind::Narration,
                generation,
            } => Some(Event::NarrationEnded { generation }),
            AudioNotice::Ended {
                kind: PlaybackKind::Word,
                generation,
            } => Some(Event::WordAudioEnded { generation }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    PlayNarration {
        audio: AudioRef,
        generation: u64,
        track_position: bool,
    },
    PlayWordAudio {
        audio: AudioRef,
        generation: u64,
    },
    SeekNarration {
        generation: u64,
        to: Duration,
    },
    StopAudio,
}

/// Ephemeral page state; created on mount, dropped on unmount.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub phase: Phase,
    /// Index into the current section's timings of the word being narrated.
    pub highlighted: Option<usize>,
    pub show_modal: bool,
    pub play_narration: bool,
    /// Practiced word whose audio is playing.
    pub active_word: Option<Word>,
    pub generation: u64,
    /// Most recent rejected action, surfaced to the view.
    pub last_error: Option<ReduceError>,
}

impl Session {
    fn new() -> Self {
        Self {
            phase: Phase::Idle,
            highlighted: None,
            show_modal: false,
            play_narration: false,
            active_word: None,
            generation: 0,
            last_error: None,
        }
    }
}

pub struct StoryController {
    store: Store,
    session: Session,
    options: ControllerOptions,
}

impl StoryController {
    pub fn new(store: Store, options: ControllerOptions) -> Self {
        Self {
            store,
            session: Session::new(),
            options,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_story(&self) -> Option<&Arc<Story>> {
        self.store.state().story.current()
    }

    pub fn handle(&mut self, event: Event) -> Vec<Command> {
        debug!(?event, phase = ?self.session.phase, "Controller event");
        match event {
            Event::Mounted { story_id } => self.open_story(story_id, "Mounting story page"),
            Event::StoryPicked { story_id } => self.open_story(story_id, "Story picked"),
            Event::NarrationPosition {
                generation,
                position,
            } => {
                if self.is_live(generation) {
                    self.on_narration_position(position);
                }
                Vec::new()
            }
            Event::NarrationEnded { generation } => {
                if !self.is_live(generation) {
                    return Vec::new();
                }
                self.on_narration_ended()
            }
            Event::WordAudioEnded { generation } => {
                if !self.is_live(generation) {
                    return Vec::new();
                }
                self.on_word_audio_ended()
            }
            Event::AudioFailed { generation } => {
                if !self.is_live(generation) {
                    return Vec::new();
                }
                warn!(generation, phase = ?self.session.phase, "Playback failed to start");
                match self.session.phase {
                    Phase::PlayingNarration { .. } => self.on_narration_ended(),
                    Phase::PlayingWordAudio { .. } => self.on_word_audio_ended(),
                    _ => Vec::new(),
                }
            }
            Event::SlotClicked { section } => self.on_slot_clicked(section),
            Event::QuizWordPicked { word } => {
                self.on_quiz_word_picked(word);
                Vec::new()
            }
            Event::WordConfirmed => self.on_word_confirmed(),
            Event::ModalDismissed => {
                if !self.session.show_modal {
                    return Vec::new();
                }
                self.session.show_modal = false;
                self.session.play_narration = false;
                self.session.phase = Phase::Idle;
                Vec::new()
            }
            Event::PlayRequested => self.on_play_requested(),
            Event::Unmounted => {
                let generation = self.session.generation;
                self.session = Session::new();
                // Keep counting so notices from the old page stay stale.
                self.session.generation = generation.wrapping_add(1);
                info!("Story page unmounted");
                vec![Command::StopAudio]
            }
        }
    }

    fn is_live(&self, generation: u64) -> bool {
        if generation == self.session.generation {
            true
        } else {
            debug!(
                generation,
                current = self.session.generation,
                "Ignoring stale audio notification"
            );
            false
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.session.generation = self.session.generation.wrapping_add(1);
        self.session.generation
    }

    fn dispatch(&mut self, action: Action) -> bool {
        let report = self.store.dispatch(action);
        match report.errors().next() {
            Some(err) => {
                self.session.last_error = Some(err.clone());
                false
            }
            None => {
                self.session.last_error = None;
                true
            }
        }
    }

    fn open_story(&mut self, story_id: StoryId, reason: &'static str) -> Vec<Command> {
        info!(story_id = %story_id, "{reason}");
        self.session.show_modal = false;
        self.session.active_word = None;
        self.session.highlighted = None;
        if !self.dispatch(Action::SelectStory { id: story_id }) {
            warn!(story_id = %story_id, "No story with this id");
            self.session.phase = Phase::NoStory {
                requested: story_id,
            };
            self.session.play_narration = false;
            self.next_generation();
            return vec![Command::StopAudio];
        }
        self.derive_from_story()
    }

    /// Decide what the page does for the story as it now stands: replay the
    /// word just practiced, narrate the current section, or finish.
    fn derive_from_story(&mut self) -> Vec<Command> {
        let Some(story) = self.current_story().cloned() else {
            self.session.phase = Phase::Idle;
            return vec![Command::StopAudio];
        };
        if self.session.show_modal {
            return Vec::new();
        }

        let practiced = story
            .previous_section()
            .and_then(|section| section.word.clone())
            .filter(|word| word.practice_audio().is_some());
        match practiced {
            Some(word) => self.start_word_audio(word),
            None => self.start_narration(&story),
        }
    }

    fn start_narration(&mut self, story: &Story) -> Vec<Command> {
        let Some(section) = story.current_section() else {
            return self.finish(story.id);
        };
        let section_idx = story.curr_section_idx;
        let audio = section.audio.clone();
        let track_position = section.highlights_by_timing();
        let generation = self.next_generation();

        self.session.phase = Phase::PlayingNarration {
            section: section_idx,
        };
        self.session.play_narration = true;
        self.session.active_word = None;
        self.session.highlighted = None;
        info!(
            story_id = %story.id,
            section = section_idx,
            generation,
            track_position,
            "Playing section narration"
        );
        vec![Command::PlayNarration {
            audio,
            generation,
            track_position,
        }]
    }

    fn start_word_audio(&mut self, word: Word) -> Vec<Command> {
        let Some(audio) = word.audio.clone() else {
            return Vec::new();
        };
        let generation = self.next_generation();
        info!(word = %word.text, generation, "Playing practiced word");
        self.session.phase = Phase::PlayingWordAudio { word: word.id };
        self.session.play_narration = false;
        self.session.active_word = Some(word);
        vec![Command::PlayWordAudio { audio, generation }]
    }

    fn finish(&mut self, story_id: StoryId) -> Vec<Command> {
        self.session.play_narration = false;
        self.session.active_word = None;
        self.session.highlighted = None;

        if self.options.continue_to_next_story {
            if let Some(next) = self.next_unfinished_story(story_id) {
                info!(finished = %story_id, next = %next, "Story finished; continuing");
                return self.open_story(next, "Opening next story");
            }
        }

        info!(story_id = %story_id, "Story finished");
        self.session.phase = Phase::Finished;
        self.next_generation();
        vec![Command::StopAudio]
    }

    fn next_unfinished_story(&self, after: StoryId) -> Option<StoryId> {
        let stories = &self.store.state().story.stories;
        let start = stories.iter().position(|story| story.id == after)?;
        stories
            .iter()
            .skip(start + 1)
            .chain(stories.iter().take(start))
            .find(|story| !story.is_complete())
            .map(|story| story.id)
    }

    fn on_narration_position(&mut self, position: Duration) {
        let Phase::PlayingNarration { section } = self.session.phase else {
            return;
        };
        let Some(story) = self.current_story() else {
            return;
        };
        let found = story
            .sections
            .get(section)
            .and_then(|s| s.timing_at(position.as_secs_f32()));
        if let Some(idx) = found {
            if self.session.highlighted != Some(idx) {
                debug!(section, word_idx = idx, "Highlighting narrated word");
                self.session.highlighted = Some(idx);
            }
        }
    }

    fn on_narration_ended(&mut self) -> Vec<Command> {
        let Phase::PlayingNarration { section } = self.session.phase else {
            return Vec::new();
        };
        let Some(story) = self.current_story().cloned() else {
            return Vec::new();
        };
        self.session.play_narration = false;

        let requires_practice = story
            .sections
            .get(section)
            .map(|s| s.requires_practice)
            .unwrap_or(false);
        if requires_practice {
            info!(story_id = %story.id, section, "Narration ended; opening word practice");
            self.dispatch(Action::SelectQuizWord { word: None });
            self.session.show_modal = true;
            self.session.phase = Phase::AwaitingWordChoice { section };
            return Vec::new();
        }

        if !self.dispatch(Action::AdvanceSection { story_id: story.id }) {
            self.session.phase = Phase::Idle;
            return Vec::new();
        }
        self.derive_from_story()
    }

    fn on_word_audio_ended(&mut self) -> Vec<Command> {
        self.session.active_word = None;
        self.session.show_modal = false;
        let Some(story) = self.current_story().cloned() else {
            self.session.phase = Phase::Idle;
            return Vec::new();
        };
        self.start_narration(&story)
    }

    fn on_slot_clicked(&mut self, section: usize) -> Vec<Command> {
        let Some(story) = self.current_story().cloned() else {
            return Vec::new();
        };
        let clickable = story
            .sections
            .get(section)
            .map(|s| s.requires_practice)
            .unwrap_or(false);
        if !clickable {
            debug!(section, "Slot is not open for practice");
            return Vec::new();
        }
        if !self.dispatch(Action::ChangeCurrentSection {
            story_id: story.id,
            idx: section,
        }) {
            return Vec::new();
        }

        info!(story_id = %story.id, section, "Slot clicked; opening word practice");
        self.dispatch(Action::SelectQuizWord { word: None });
        self.session.play_narration = false;
        self.session.active_word = None;
        self.session.show_modal = true;
        self.session.phase = Phase::AwaitingWordChoice { section };
        self.next_generation();
        vec![Command::StopAudio]
    }

    fn on_quiz_word_picked(&mut self, word_id: WordId) {
        if !self.session.show_modal {
            return;
        }
        let Some(word) = self.store.state().word.word(word_id).cloned() else {
            self.session.last_error = Some(ReduceError::WordNotFound(word_id));
            return;
        };
        if !self.choices().contains(&word_id) {
            debug!(word = %word.text, "Word is not offered for this section");
            return;
        }
        self.dispatch(Action::SelectQuizWord { word: Some(word) });
    }

    fn on_word_confirmed(&mut self) -> Vec<Command> {
        if !self.session.show_modal {
            return Vec::new();
        }
        let Some(mut word) = self.store.state().quiz.word.clone() else {
            return Vec::new();
        };
        let Some(story_id) = self.current_story().map(|story| story.id) else {
            return Vec::new();
        };
        word.complete = true;
        info!(story_id = %story_id, word = %word.text, "Word mastered");
        if !self.dispatch(Action::MasterWord { word, story_id }) {
            return Vec::new();
        }
        self.dispatch(Action::SelectQuizWord { word: None });
        self.session.show_modal = false;
        self.derive_from_story()
    }

    fn on_play_requested(&mut self) -> Vec<Command> {
        if self.session.show_modal {
            return Vec::new();
        }
        if let Phase::PlayingNarration { .. } = self.session.phase {
            return vec![Command::SeekNarration {
                generation: self.session.generation,
                to: Duration::ZERO,
            }];
        }
        let Some(story) = self.current_story().cloned() else {
            return Vec::new();
        };
        self.start_narration(&story)
    }

    /// Words offered in the practice prompt for the section being practiced.
    pub fn choices(&self) -> Vec<WordId> {
        let words = &self.store.state().word.words;
        let offered = match self.session.phase {
            Phase::AwaitingWordChoice { section } => self
                .current_story()
                .and_then(|story| story.sections.get(section))
                .map(|s| s.choices.clone())
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        if offered.is_empty() {
            words.iter().map(|word| word.id).collect()
        } else {
            offered
        }
    }
}
