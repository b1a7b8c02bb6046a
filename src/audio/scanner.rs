use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Collects the locations of playable files under a directory.
///
/// The scanner only lists paths; ordering is left to `PlaylistOrder`.
#[derive(Debug, Clone)]
pub struct MusicScanner {
    supported_extensions: Vec<String>,
}

impl MusicScanner {
    pub fn new() -> Self {
        Self::with_extensions(&["mp3", "flac", "ogg", "oga", "mp4", "m4a", "aac", "wav"])
    }

    pub fn with_extensions<S: AsRef<str>>(extensions: &[S]) -> Self {
        Self {
            supported_extensions: extensions
                .iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn scan_directory<P: AsRef<Path>>(&self, path: P) -> Result<Vec<PathBuf>> {
        let root = path.as_ref();
        if !root.is_dir() {
            return Err(anyhow::anyhow!("Not a directory: {}", root.display()))
                .context("Failed to scan music directory");
        }

        let mut paths = Vec::new();

        for entry in WalkDir::new(root).follow_links(true).into_iter().filter_map(Result::ok) {
            let path = entry.path();

            if !entry.file_type().is_file() {
                continue;
            }

            // Skip hidden files (dotfiles)
            if path
                .file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| n.starts_with('.'))
            {
                continue;
            }

            // Skip empty files or files > 1GB
            if let Ok(metadata) = fs::metadata(path) {
                if metadata.len() == 0 || metadata.len() > 1_000_000_000 {
                    debug!("skipping {} ({} bytes)", path.display(), metadata.len());
                    continue;
                }
            }

            if self.is_supported_file(path) {
                paths.push(path.to_path_buf());
            }
        }

        info!("Found {} tracks in {}", paths.len(), root.display());
        Ok(paths)
    }

    fn is_supported_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.supported_extensions.iter().any(|s| *s == ext)
            })
            .unwrap_or(false)
    }
}

impl Default for MusicScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn finds_supported_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "alpha.mp3", b"x");
        let b = touch(dir.path(), "nested/beta.FLAC", b"x");
        touch(dir.path(), "notes.txt", b"x");
        touch(dir.path(), ".hidden.mp3", b"x");
        touch(dir.path(), "empty.mp3", b"");

        let mut found = MusicScanner::new().scan_directory(dir.path()).unwrap();
        found.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(found, expected);
    }

    #[test]
    fn custom_extensions_restrict_results() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "alpha.mp3", b"x");
        let wav = touch(dir.path(), "beta.wav", b"x");

        let found = MusicScanner::with_extensions(&[".wav"])
            .scan_directory(dir.path())
            .unwrap();
        assert_eq!(found, vec![wav]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(MusicScanner::new().scan_directory(&missing).is_err());
    }
}
