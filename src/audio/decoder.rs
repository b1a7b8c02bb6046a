use crate::error::DecodeError;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

/// Fully decoded audio of a single file.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub duration_seconds: f64,
    pub frame_rate: u32,
    pub channels: u16,
    /// Interleaved samples, `channels` values per frame.
    pub samples: Vec<f32>,
}

/// Turns a track location into decoded audio.
///
/// `Track` calls this at most once per successful decode; implementations are
/// free to block.
pub trait Decode {
    fn decode(&self, location: &Path) -> Result<DecodedAudio, DecodeError>;
}

/// Decoder backed by symphonia's default probe and codec registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decode for SymphoniaDecoder {
    fn decode(&self, location: &Path) -> Result<DecodedAudio, DecodeError> {
        let file = File::open(location).map_err(|source| DecodeError::Io {
            path: location.to_path_buf(),
            source,
        })?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = location.extension().and_then(|ext| ext.to_str()) {
            hint.with_extension(extension);
        }

        let meta_opts: MetadataOptions = Default::default();
        let fmt_opts: FormatOptions = Default::default();

        let probed = symphonia::default::get_probe().format(&hint, mss, &fmt_opts, &meta_opts)?;

        let mut format = probed.format;
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| DecodeError::NoAudioTrack(location.to_path_buf()))?;

        let track_id = track.id;
        let frame_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| DecodeError::UnknownSampleRate(location.to_path_buf()))?;
        let mut channels = track
            .codec_params
            .channels
            .map(|c| c.count() as u16)
            .unwrap_or(0);

        let mut decoder =
            symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

        let mut samples = Vec::new();
        let mut sample_buf: Option<SampleBuffer<f32>> = None;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                // End of stream is reported as an unexpected EOF
                Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => return Err(e.into()),
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    if channels == 0 {
                        channels = decoded.spec().channels.count() as u16;
                    }
                    let buf = sample_buf.get_or_insert_with(|| {
                        SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec())
                    });
                    buf.copy_interleaved_ref(decoded);
                    samples.extend_from_slice(buf.samples());
                }
                // Corrupt frames are skipped, the rest of the stream is still usable
                Err(SymphoniaError::DecodeError(e)) => {
                    debug!("skipping undecodable packet in {}: {}", location.display(), e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        let channels = channels.max(1);
        let frames = samples.len() / channels as usize;
        let duration_seconds = frames as f64 / frame_rate as f64;

        debug!(
            "decoded {} ({:.2}s, {} Hz, {} ch)",
            location.display(),
            duration_seconds,
            frame_rate,
            channels
        );

        Ok(DecodedAudio {
            duration_seconds,
            frame_rate,
            channels,
            samples,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SymphoniaDecoder::new()
            .decode(Path::new("/definitely/not/here.mp3"))
            .unwrap_err();
        assert!(matches!(err, DecodeError::Io { .. }));
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let mut file = tempfile::Builder::new().suffix(".mp3").tempfile().unwrap();
        file.write_all(b"this is not an mp3 file at all").unwrap();

        let result = SymphoniaDecoder::new().decode(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn decodes_pcm_wav() {
        // 0.5s of 8 kHz mono 16-bit silence
        let frame_rate: u32 = 8000;
        let frames: u32 = 4000;
        let data_len = frames * 2;

        let mut wav = Vec::new();
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
        wav.extend_from_slice(&1u16.to_le_bytes()); // mono
        wav.extend_from_slice(&frame_rate.to_le_bytes());
        wav.extend_from_slice(&(frame_rate * 2).to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        wav.resize(wav.len() + data_len as usize, 0);

        let mut file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        file.write_all(&wav).unwrap();

        let decoded = SymphoniaDecoder::new().decode(file.path()).unwrap();
        assert_eq!(decoded.frame_rate, 8000);
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.samples.len(), frames as usize);
        assert!((decoded.duration_seconds - 0.5).abs() < 1e-6);
    }
}
