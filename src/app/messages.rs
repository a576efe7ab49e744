use iced::keyboard::{Key, Modifiers};
use std::time::Instant;
use storybook_core::{StoryId, WordId};

/// Messages emitted by the UI and the runtime.
#[derive(Debug, Clone)]
pub enum Message {
    Mounted,
    StoryPicked(StoryId),
    SlotClicked(usize),
    QuizWordPicked(WordId),
    WordConfirmed,
    ModalDismissed,
    PlayRequested,
    /// Periodic sample of the live playback.
    Tick(Instant),
    PlaybackFailed {
        generation: u64,
    },
    KeyPressed {
        key: Key,
        modifiers: Modifiers,
    },
    PollSystemSignals,
    SafeQuit,
}
