pub mod decoder;
#[cfg(feature = "audio")]
pub mod player;
pub mod scanner;
pub mod track;

pub use decoder::{Decode, DecodedAudio, SymphoniaDecoder};
#[cfg(feature = "audio")]
pub use player::{AudioPlayer, PlaybackState};
pub use scanner::MusicScanner;
pub use track::Track;

#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub volume: f32, // 0.0 to 1.0
    pub seek_seconds: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: 0.7,
            seek_seconds: 5,
        }
    }
}

impl From<&crate::config::Config> for AudioConfig {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            volume: config.audio.volume.clamp(0.0, 1.0),
            seek_seconds: config.controls.seek_seconds,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Flac,
    Ogg,
    Mp4,
    Wav,
    Unknown,
}

impl AudioFormat {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "mp3" => AudioFormat::Mp3,
            "flac" => AudioFormat::Flac,
            "ogg" | "oga" => AudioFormat::Ogg,
            "mp4" | "m4a" | "aac" => AudioFormat::Mp4,
            "wav" => AudioFormat::Wav,
            _ => AudioFormat::Unknown,
        }
    }
}
