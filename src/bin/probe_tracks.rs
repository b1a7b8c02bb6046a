use anyhow::Result;
use cplayer::{MusicScanner, PlaylistOrder, SymphoniaDecoder, Track};
use std::path::PathBuf;

// Decodes every track in a directory and prints what the player would show.
// Usage: probe_tracks [music_directory]
fn main() -> Result<()> {
    let music_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(dirs::audio_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    println!("Scanning directory: {}", music_dir.display());

    let mut paths = MusicScanner::new().scan_directory(&music_dir)?;
    PlaylistOrder::Ascending.arrange(&mut paths);
    println!("Found {} tracks", paths.len());
    println!();

    let decoder = SymphoniaDecoder::new();
    let mut failures = 0;

    for (i, path) in paths.into_iter().enumerate() {
        let mut track = Track::new(path);
        match track.duration(&decoder) {
            Ok(seconds) => {
                let seconds = seconds.round() as u64;
                let samples = track.samples().map(|s| s.len()).unwrap_or(0);
                println!(
                    "{:>4}. {}  {}:{:02}  {} Hz  {} samples",
                    i + 1,
                    track.name(),
                    seconds / 60,
                    seconds % 60,
                    track.frame_rate().unwrap_or(0),
                    samples
                );
            }
            Err(e) => {
                failures += 1;
                println!("{:>4}. {}  error: {}", i + 1, track.name(), e);
            }
        }
    }

    if failures > 0 {
        println!("\n{} tracks could not be decoded", failures);
    }

    Ok(())
}
