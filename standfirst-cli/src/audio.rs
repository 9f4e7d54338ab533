//! Audible cues using rodio.
//!
//! Sound files are read into memory once and decoded fresh for each play,
//! so overlapping cues mix instead of queueing. A missing output device or
//! sound file is logged and the session runs silent.

use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use standfirst::config::SoundSettings;

/// Gap between the two startup cues.
const STARTUP_GAP: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Someone stood up.
    Beep,
    /// Everyone is seated, ask the next question.
    Ready,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Beep => "beep",
            Cue::Ready => "ready",
        }
    }
}

/// Open output device plus the loaded cue sounds.
pub struct AudioCues {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    beep: Option<Vec<u8>>,
    ready: Option<Vec<u8>>,
}

impl AudioCues {
    /// Open the default output device and load both cues.
    ///
    /// Returns `None` when there is no usable output device.
    pub fn open(settings: &SoundSettings) -> Option<Self> {
        let (stream, handle) = match OutputStream::try_default() {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(error = %e, "No audio output device, running silent");
                return None;
            }
        };

        Some(Self {
            _stream: stream,
            handle,
            beep: load_sound(&settings.resolve(&settings.beep)),
            ready: load_sound(&settings.resolve(&settings.ready)),
        })
    }

    /// Start playing a cue without waiting for it to finish.
    pub fn play(&self, cue: Cue) {
        let bytes = match cue {
            Cue::Beep => &self.beep,
            Cue::Ready => &self.ready,
        };
        let Some(bytes) = bytes else {
            return;
        };

        let decoder = match Decoder::new(Cursor::new(bytes.clone())) {
            Ok(decoder) => decoder,
            Err(e) => {
                tracing::warn!(cue = cue.as_str(), error = %e, "Failed to decode sound");
                return;
            }
        };
        match Sink::try_new(&self.handle) {
            Ok(sink) => {
                sink.append(decoder);
                sink.detach();
                tracing::debug!(cue = cue.as_str(), "Playing cue");
            }
            Err(e) => tracing::warn!(cue = cue.as_str(), error = %e, "Failed to play sound"),
        }
    }

    /// Play the ready cue, then the beep, so the operator can check the
    /// speakers.
    pub fn startup_check(&self) {
        self.play(Cue::Ready);
        std::thread::sleep(STARTUP_GAP);
        self.play(Cue::Beep);
    }
}

/// Read a sound file, logging and returning `None` on failure.
fn load_sound(path: &Path) -> Option<Vec<u8>> {
    match fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Sound file unavailable");
            None
        }
    }
}
