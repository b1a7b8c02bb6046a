// Error types shared by the track model and the playlist navigator.
// Application layers wrap these in anyhow, library code returns them directly.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a track location into decoded audio.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed or unsupported media: {0}")]
    Format(#[from] symphonia::core::errors::Error),

    #[error("no decodable audio track in {0}")]
    NoAudioTrack(PathBuf),

    #[error("unknown sample rate in {0}")]
    UnknownSampleRate(PathBuf),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigatorError {
    /// Search or selection was attempted against zero candidates.
    #[error("the active view has no tracks")]
    EmptyView,
}
