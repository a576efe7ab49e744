use crate::audio::RodioBackend;
use crate::config::{AppConfig, ThemeMode};
use iced::{Color, Task};
use std::path::PathBuf;
use storybook_core::{AudioChannel, ControllerOptions, ImageRef, StoryController, StoryId, Store};
use tracing::info;

use super::messages::Message;

/// Reader window state. The controller owns the story data and the page
/// session; the channel owns whatever audio is playing.
pub struct App {
    pub(super) config: AppConfig,
    pub(super) controller: StoryController,
    pub(super) audio: AudioChannel<RodioBackend>,
    pub(super) requested_story: StoryId,
}

impl App {
    pub fn bootstrap(store: Store, config: AppConfig, story: StoryId) -> (App, Task<Message>) {
        let options = ControllerOptions {
            continue_to_next_story: config.continue_to_next_story,
        };
        info!(
            story_id = %story,
            continue_to_next_story = options.continue_to_next_story,
            stories = store.state().story.stories.len(),
            "Bootstrapping reader"
        );
        let mut app = App {
            audio: AudioChannel::new(RodioBackend::new(&config.assets_dir)),
            controller: StoryController::new(store, options),
            config,
            requested_story: story,
        };
        let task = app.update(Message::Mounted);
        (app, task)
    }

    pub(super) fn highlight_color(&self) -> Color {
        let base = self.config.highlight();
        Color {
            r: base.r,
            g: base.g,
            b: base.b,
            a: base.a,
        }
    }

    pub(super) fn image_path(&self, img: &ImageRef) -> PathBuf {
        PathBuf::from(&self.config.assets_dir).join(img.as_str())
    }

    pub(super) fn is_night(&self) -> bool {
        matches!(self.config.theme, ThemeMode::Night)
    }
}
