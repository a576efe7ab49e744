//! Scoped ownership of the one playback the page may have running.
//!
//! The channel tags each playback with a generation. Notifications are only
//! produced for the live generation, and the previous playback is stopped
//! before a new one starts and when the channel is dropped, so listeners from
//! replaced audio can never reach the controller.

use crate::model::AudioRef;
use std::time::Duration;
use tracing::{debug, warn};

/// Starts playbacks. Implemented by the real audio device and by test fakes.
pub trait AudioBackend {
    type Handle: PlaybackHandle;
    type Error: std::fmt::Display;

    fn start(&mut self, source: &AudioRef, volume: f32) -> Result<Self::Handle, Self::Error>;
}

pub trait PlaybackHandle {
    fn position(&self) -> Duration;
    fn is_finished(&self) -> bool;
    fn seek(&mut self, to: Duration);
    fn stop(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackKind {
    Narration,
    Word,
}

/// Notification produced by `AudioChannel::poll`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioNotice {
    Position {
        kind: PlaybackKind,
        generation: u64,
        position: Duration,
    },
    Ended {
        kind: PlaybackKind,
        generation: u64,
    },
}

struct Active<H> {
    handle: H,
    kind: PlaybackKind,
    generation: u64,
    report_position: bool,
}

pub struct AudioChannel<B: AudioBackend> {
    backend: B,
    active: Option<Active<B::Handle>>,
}

impl<B: AudioBackend> AudioChannel<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            active: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_generation(&self) -> Option<u64> {
        self.active.as_ref().map(|active| active.generation)
    }

    /// Replace whatever is playing with `source`. On failure nothing plays and
    /// the caller gets the error; the previous playback is stopped either way.
    pub fn play(
        &mut self,
        source: &AudioRef,
        kind: PlaybackKind,
        generation: u64,
        volume: f32,
        report_position: bool,
    ) -> Result<(), B::Error> {
        self.stop();
        let handle = self.backend.start(source, volume)?;
        debug!(
            source = source.as_str(),
            ?kind,
            generation,
            report_position,
            "Started playback"
        );
        self.active = Some(Active {
            handle,
            kind,
            generation,
            report_position,
        });
        Ok(())
    }

    pub fn seek(&mut self, generation: u64, to: Duration) -> bool {
        match self.active.as_mut() {
            Some(active) if active.generation == generation => {
                active.handle.seek(to);
                true
            }
            _ => {
                warn!(generation, "Seek ignored; playback is not live");
                false
            }
        }
    }

    pub fn stop(&mut self) {
        if let Some(mut active) = self.active.take() {
            debug!(generation = active.generation, kind = ?active.kind, "Stopping playback");
            active.handle.stop();
        }
    }

    /// Sample the live playback. A finished playback yields `Ended` exactly
    /// once and is released.
    pub fn poll(&mut self) -> Vec<AudioNotice> {
        let Some(active) = self.active.as_ref() else {
            return Vec::new();
        };
        let mut notices = Vec::new();
        if active.report_position {
            notices.push(AudioNotice::Position {
                kind: active.kind,
                generation: active.generation,
                position: active.handle.position(),
            });
        }
        if active.handle.is_finished() {
            notices.push(AudioNotice::Ended {
                kind: active.kind,
                generation: active.generation,
            });
            self.stop();
        }
        notices
    }
}

impl<B: AudioBackend> Drop for AudioChannel<B> {
    fn drop(&mut self) {
        self.stop();
    }
}
