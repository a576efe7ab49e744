use super::super::super::messages::Message;
use super::super::super::state::App;
use super::super::Effect;
use iced::Event;
use iced::Task;
use iced::event;
use iced::keyboard;
use iced::window;
use storybook_core::{Command, PlaybackKind};
use tracing::{info, warn};

impl App {
    pub(super) fn run_effect(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::Audio(Command::PlayNarration {
                audio,
                generation,
                track_position,
            }) => {
                let volume = self.config.narration_volume;
                match self.audio.play(
                    &audio,
                    PlaybackKind::Narration,
                    generation,
                    volume,
                    track_position,
                ) {
                    Ok(()) => Task::none(),
                    Err(err) => {
                        warn!(audio = audio.as_str(), generation, "Narration failed: {err:#}");
                        Task::done(Message::PlaybackFailed { generation })
                    }
                }
            }
            Effect::Audio(Command::PlayWordAudio { audio, generation }) => {
                let volume = self.config.word_volume;
                match self
                    .audio
                    .play(&audio, PlaybackKind::Word, generation, volume, false)
                {
                    Ok(()) => Task::none(),
                    Err(err) => {
                        warn!(audio = audio.as_str(), generation, "Word audio failed: {err:#}");
                        Task::done(Message::PlaybackFailed { generation })
                    }
                }
            }
            Effect::Audio(Command::SeekNarration { generation, to }) => {
                self.audio.seek(generation, to);
                Task::none()
            }
            Effect::Audio(Command::StopAudio) => {
                self.audio.stop();
                Task::none()
            }
            Effect::QuitSafely => {
                info!("Quitting storybook reader");
                self.audio.stop();
                iced::exit()
            }
        }
    }
}

pub(super) fn runtime_event_to_message(
    event: Event,
    status: event::Status,
    _window_id: window::Id,
) -> Option<Message> {
    if status == event::Status::Captured {
        return None;
    }
    match event {
        Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => {
            Some(Message::KeyPressed { key, modifiers })
        }
        Event::Window(window::Event::CloseRequested) => Some(Message::SafeQuit),
        _ => None,
    }
}
