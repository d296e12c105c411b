use crate::audio::decoder::{AudioClip, AudioHandle};
use crate::error::SpeechError;

/// The audio output a playback session drives.
///
/// Playback begins as soon as `start` returns; there is no pre-roll.
/// End-of-audio is observed through `is_finished` and reported back to the
/// controller by whoever drives it.
pub trait AudioBackend {
    fn start(&mut self, handle: &AudioHandle, clip: &AudioClip) -> Result<(), SpeechError>;

    /// Stop and rewind. Must be a no-op when nothing is playing.
    fn halt(&mut self);

    /// Whether the clip started last has played to the end
    fn is_finished(&self) -> bool;
}

/// Backend with no output device. Clips "finish" the moment they start,
/// which suits `--no-play` runs that only want the download.
#[derive(Debug, Default)]
pub struct NullBackend {
    started: Vec<String>,
}

impl NullBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// URIs of every clip started so far
    pub fn started(&self) -> &[String] {
        &self.started
    }
}

impl AudioBackend for NullBackend {
    fn start(&mut self, handle: &AudioHandle, _clip: &AudioClip) -> Result<(), SpeechError> {
        self.started.push(handle.uri().to_string());
        Ok(())
    }

    fn halt(&mut self) {}

    fn is_finished(&self) -> bool {
        true
    }
}
