use super::super::super::messages::Message;
use super::super::super::state::App;
use super::super::Effect;
use storybook_core::Event;
use tracing::{debug, info};

impl App {
    pub(super) fn reduce(&mut self, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();

        match message {
            Message::Mounted => {
                let story_id = self.requested_story;
                self.handle_page_event(Event::Mounted { story_id }, &mut effects);
            }
            Message::StoryPicked(story_id) => {
                self.requested_story = story_id;
                self.handle_page_event(Event::StoryPicked { story_id }, &mut effects);
            }
            Message::SlotClicked(section) => {
                self.handle_page_event(Event::SlotClicked { section }, &mut effects);
            }
            Message::QuizWordPicked(word) => {
                self.handle_page_event(Event::QuizWordPicked { word }, &mut effects);
            }
            Message::WordConfirmed => self.handle_page_event(Event::WordConfirmed, &mut effects),
            Message::ModalDismissed => self.handle_page_event(Event::ModalDismissed, &mut effects),
            Message::PlayRequested => self.handle_page_event(Event::PlayRequested, &mut effects),
            Message::Tick(_) => self.handle_tick(&mut effects),
            Message::PlaybackFailed { generation } => {
                self.handle_page_event(Event::AudioFailed { generation }, &mut effects);
            }
            Message::KeyPressed { key, modifiers } => {
                if let Some(shortcut) = self.shortcut_message_for_key(key, modifiers) {
                    debug!(?shortcut, "Keyboard shortcut");
                    effects.extend(self.reduce(shortcut));
                }
            }
            Message::PollSystemSignals => self.handle_poll_system_signals(&mut effects),
            Message::SafeQuit => self.handle_safe_quit(&mut effects),
        }

        effects
    }

    fn handle_page_event(&mut self, event: Event, effects: &mut Vec<Effect>) {
        effects.extend(self.controller.handle(event).into_iter().map(Effect::Audio));
    }

    fn handle_tick(&mut self, effects: &mut Vec<Effect>) {
        for notice in self.audio.poll() {
            if let Some(event) = Event::from_notice(notice) {
                self.handle_page_event(event, effects);
            }
        }
    }

    fn handle_poll_system_signals(&mut self, effects: &mut Vec<Effect>) {
        if crate::take_sigint_requested() {
            info!("Interrupt received; quitting");
            self.handle_safe_quit(effects);
        }
    }

    fn handle_safe_quit(&mut self, effects: &mut Vec<Effect>) {
        self.handle_page_event(Event::Unmounted, effects);
        effects.push(Effect::QuitSafely);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::library::load_library;
    use std::path::Path;
    use storybook_core::{Command, Phase, StoryId, Store};

    fn app() -> App {
        let config = AppConfig {
            assets_dir: "does/not/exist".to_string(),
            stories_path: "does/not/exist.json".to_string(),
            ..AppConfig::default()
        };
        let state = load_library(Path::new(&config.stories_path)).unwrap();
        let (app, _task) = App::bootstrap(Store::new(state), config, StoryId(1));
        app
    }

    #[test]
    fn bootstrap_mounts_requested_story() {
        let app = app();
        assert_eq!(
            app.controller.current_story().map(|story| story.id),
            Some(StoryId(1))
        );
        assert_eq!(
            app.controller.session().phase,
            Phase::PlayingNarration { section: 0 }
        );
        // The narration file is missing, so nothing is left playing.
        assert!(!app.audio.is_active());
    }

    #[test]
    fn failed_narration_opens_word_practice() {
        let mut app = app();
        let generation = app.controller.session().generation;
        let effects = app.reduce(Message::PlaybackFailed { generation });
        assert!(effects.is_empty());
        assert!(app.controller.session().show_modal);
        assert_eq!(
            app.controller.session().phase,
            Phase::AwaitingWordChoice { section: 0 }
        );
    }

    #[test]
    fn stale_failure_is_ignored() {
        let mut app = app();
        let generation = app.controller.session().generation;
        app.reduce(Message::PlaybackFailed {
            generation: generation.wrapping_sub(1),
        });
        assert!(!app.controller.session().show_modal);
    }

    #[test]
    fn safe_quit_stops_audio_then_exits() {
        let mut app = app();
        let effects = app.reduce(Message::SafeQuit);
        assert!(matches!(
            effects.as_slice(),
            [Effect::Audio(Command::StopAudio), Effect::QuitSafely]
        ));
    }

    #[test]
    fn picking_missing_story_shows_placeholder() {
        let mut app = app();
        app.reduce(Message::StoryPicked(StoryId(42)));
        assert_eq!(app.requested_story, StoryId(42));
        assert_eq!(
            app.controller.session().phase,
            Phase::NoStory {
                requested: StoryId(42)
            }
        );
    }
}
