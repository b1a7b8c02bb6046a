use super::decoder::{Decode, DecodedAudio};
use super::AudioFormat;
use crate::error::DecodeError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// A playable item in the playlist.
///
/// The location never changes; decoded attributes are computed on demand and
/// cached for the lifetime of the track. Clones share the cached audio.
#[derive(Debug, Clone)]
pub struct Track {
    location: PathBuf,
    name: String,
    pub format: AudioFormat,
    duration_seconds: Option<f64>,
    frame_rate: Option<u32>,
    audio: Option<Arc<DecodedAudio>>,
    buffer: Option<Arc<[f32]>>,
    selected: bool,
}

impl Track {
    pub fn new(location: PathBuf) -> Self {
        let format = location
            .extension()
            .and_then(|ext| ext.to_str())
            .map(AudioFormat::from_extension)
            .unwrap_or(AudioFormat::Unknown);

        let name = location
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| location.to_string_lossy().into_owned());

        Self {
            location,
            name,
            format,
            duration_seconds: None,
            frame_rate: None,
            audio: None,
            buffer: None,
            selected: false,
        }
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Display name, the file name of the location.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Duration in seconds, decoding the file on first access.
    ///
    /// Errors are not cached: a later call decodes again.
    ///
    /// A success keeps the whole decoded PCM on the track (about 100 MB for
    /// five minutes of 44.1 kHz stereo) for as long as the track lives.
    pub fn duration(&mut self, decoder: &dyn Decode) -> Result<f64, DecodeError> {
        if let Some(seconds) = self.duration_seconds {
            return Ok(seconds);
        }

        let audio = decoder.decode(&self.location)?;
        let seconds = audio.duration_seconds;
        self.duration_seconds = Some(seconds);
        self.frame_rate = Some(audio.frame_rate);
        self.audio = Some(Arc::new(audio));
        Ok(seconds)
    }

    /// Cached duration, without decoding.
    pub fn known_duration(&self) -> Option<f64> {
        self.duration_seconds
    }

    pub fn frame_rate(&self) -> Option<u32> {
        self.frame_rate
    }

    /// Mono sample buffer (channel average), available once `duration` has decoded the file.
    pub fn samples(&mut self) -> Option<Arc<[f32]>> {
        if self.buffer.is_none() {
            let audio = self.audio.as_ref()?;
            self.buffer = Some(mixdown(audio));
        }
        self.buffer.clone()
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn select(&mut self, is_selected: bool) {
        if is_selected {
            info!("selecting track \"{}\"", self.location.display());
        }
        self.selected = is_selected;
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location
    }
}

impl Eq for Track {}

fn mixdown(audio: &DecodedAudio) -> Arc<[f32]> {
    let channels = audio.channels.max(1) as usize;
    if channels == 1 {
        return Arc::from(audio.samples.as_slice());
    }

    audio
        .samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}
