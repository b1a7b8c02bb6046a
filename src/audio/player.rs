use super::{AudioConfig, Track};
use anyhow::Result;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

/// Plays one track at a time on the default output device.
///
/// The player only knows about locations; which track to play next is the
/// navigator's business.
pub struct AudioPlayer {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    sink: Option<Sink>,
    current: Option<PathBuf>,
    state: PlaybackState,
    config: AudioConfig,
}

impl AudioPlayer {
    pub fn new(config: AudioConfig) -> Result<Self> {
        let (stream, stream_handle) = OutputStream::try_default()?;

        Ok(Self {
            _stream: stream,
            stream_handle,
            sink: None,
            current: None,
            state: PlaybackState::Stopped,
            config,
        })
    }

    pub fn play_track(&mut self, track: &Track) -> Result<()> {
        self.stop();

        let file = File::open(track.location()).map_err(|e| {
            anyhow::anyhow!("Failed to open audio file '{}': {}", track.location().display(), e)
        })?;

        let source = Decoder::new(BufReader::new(file)).map_err(|e| {
            anyhow::anyhow!(
                "Failed to decode audio file '{}': {}. This file may be corrupted or use an unsupported format.",
                track.location().display(),
                e
            )
        })?;

        let sink = Sink::try_new(&self.stream_handle)?;
        sink.set_volume(self.config.volume);
        sink.append(source);

        info!("Playing {}", track.location().display());
        self.sink = Some(sink);
        self.current = Some(track.location().to_path_buf());
        self.state = PlaybackState::Playing;
        Ok(())
    }

    pub fn toggle_pause(&mut self) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };

        match self.state {
            PlaybackState::Playing => {
                sink.pause();
                self.state = PlaybackState::Paused;
            }
            PlaybackState::Paused => {
                sink.play();
                self.state = PlaybackState::Playing;
            }
            PlaybackState::Stopped => {}
        }
        debug!("playback state: {:?}", self.state);
    }

    pub fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.current = None;
        self.state = PlaybackState::Stopped;
    }

    pub fn seek_forward(&mut self) {
        let step = Duration::from_secs(self.config.seek_seconds);
        let target = self.position() + step;
        self.seek_to(target);
    }

    pub fn seek_backward(&mut self) {
        let step = Duration::from_secs(self.config.seek_seconds);
        let target = self.position().saturating_sub(step);
        self.seek_to(target);
    }

    fn seek_to(&mut self, target: Duration) {
        if let Some(sink) = self.sink.as_ref() {
            if let Err(e) = sink.try_seek(target) {
                warn!("Seek to {:?} failed: {}", target, e);
            }
        }
    }

    /// Elapsed time in the current track.
    pub fn position(&self) -> Duration {
        self.sink
            .as_ref()
            .map(|sink| sink.get_pos())
            .unwrap_or(Duration::ZERO)
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_location(&self) -> Option<&PathBuf> {
        self.current.as_ref()
    }

    /// True once a playing track ran out of samples.
    pub fn is_finished(&self) -> bool {
        self.state == PlaybackState::Playing
            && self.sink.as_ref().map(|sink| sink.empty()).unwrap_or(true)
    }

    pub fn volume(&self) -> f32 {
        self.config.volume
    }
}
