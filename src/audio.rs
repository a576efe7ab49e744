//! rodio-backed playback for narration and practiced words.

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use storybook_core::{AudioBackend, AudioRef, PlaybackHandle};
use tracing::{debug, info, warn};

/// Opens audio files relative to the assets directory.
pub struct RodioBackend {
    assets_dir: PathBuf,
}

impl RodioBackend {
    pub fn new(assets_dir: impl Into<PathBuf>) -> Self {
        let assets_dir = assets_dir.into();
        info!(assets = %assets_dir.display(), "Audio backend ready");
        Self { assets_dir }
    }

    pub fn resolve(&self, source: &AudioRef) -> PathBuf {
        let path = Path::new(source.as_str());
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.assets_dir.join(path)
        }
    }
}

impl AudioBackend for RodioBackend {
    type Handle = RodioPlayback;
    type Error = anyhow::Error;

    fn start(&mut self, source: &AudioRef, volume: f32) -> Result<RodioPlayback> {
        let path = self.resolve(source);
        let file = File::open(&path).with_context(|| format!("Opening {}", path.display()))?;
        let decoder = Decoder::new(BufReader::new(file))
            .with_context(|| format!("Decoding {}", path.display()))?;

        let (_stream, handle) = OutputStream::try_default().context("Opening audio output")?;
        let sink = Sink::try_new(&handle).context("Creating sink")?;
        sink.set_volume(volume);
        sink.append(decoder);
        sink.play();
        debug!(path = %path.display(), volume, "Audio playback started");

        Ok(RodioPlayback {
            _stream,
            sink,
            started: Instant::now(),
            offset: Duration::ZERO,
        })
    }
}

/// A single playing file. The output stream lives as long as the sink.
pub struct RodioPlayback {
    _stream: OutputStream,
    sink: Sink,
    started: Instant,
    offset: Duration,
}

impl PlaybackHandle for RodioPlayback {
    fn position(&self) -> Duration {
        self.offset + self.started.elapsed()
    }

    fn is_finished(&self) -> bool {
        self.sink.empty()
    }

    fn seek(&mut self, to: Duration) {
        match self.sink.try_seek(to) {
            Ok(()) => {
                debug!(to_ms = to.as_millis(), "Seeked playback");
                self.offset = to;
                self.started = Instant::now();
            }
            Err(err) => warn!(to_ms = to.as_millis(), "Seek failed: {err}"),
        }
    }

    fn stop(&mut self) {
        debug!("Stopping audio playback");
        self.sink.stop();
    }
}
