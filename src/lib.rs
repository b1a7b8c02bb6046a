// cplayer library - core modules for the terminal music player
// The playlist navigator is the heart; audio and ui are thin hosts around it

pub mod audio;    // tracks, decoding, scanning, playback
pub mod config;   // settings, loaded once by main
pub mod error;    // decode and navigator errors
pub mod playlist; // navigator, ordering, fuzzy matching
#[cfg(all(feature = "tui", feature = "audio"))]
pub mod ui;       // terminal interface

// Export the stuff other modules actually use
pub use audio::{Decode, DecodedAudio, MusicScanner, SymphoniaDecoder, Track};
pub use config::Config;
pub use error::{DecodeError, NavigatorError};
pub use playlist::{Navigator, NavigatorEvent, NavigatorState, PlaylistOrder};
