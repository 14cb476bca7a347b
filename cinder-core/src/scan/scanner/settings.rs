use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Video container extensions recognised by the built-in parsers.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    ".mkv", ".mp4", ".avi", ".mov", ".wmv", ".flv", ".webm", ".m4v", ".mpg", ".mpeg", ".ts",
    ".m2ts", ".vob", ".3gp", ".ogv",
];

pub const AUDIO_EXTENSIONS: &[&str] = &[
    ".mp3", ".flac", ".m4a", ".aac", ".ogg", ".opus", ".wav", ".wma", ".alac", ".aiff", ".ape",
];

pub const IMAGE_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp", ".tiff",
];

pub const SUBTITLE_EXTENSIONS: &[&str] = &[
    ".srt", ".ass", ".ssa", ".sub", ".vtt", ".idx", ".sup",
];

/// Directory names skipped by default: NAS recycle bins, thumbnail caches
/// and filesystem bookkeeping folders.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    "@eaDir",
    "#recycle",
    "@Recycle",
    "$RECYCLE.BIN",
    ".Trash*",
    ".thumbnails",
    "lost+found",
    "System Volume Information",
];

/// True when `extension` (with or without the leading dot, any case) belongs
/// to one of the named groups above.
pub fn is_known_extension(extension: &str) -> bool {
    let normalized = normalize_extension(extension);
    [
        VIDEO_EXTENSIONS,
        AUDIO_EXTENSIONS,
        IMAGE_EXTENSIONS,
        SUBTITLE_EXTENSIONS,
    ]
    .iter()
    .any(|group| group.contains(&normalized.as_str()))
}

fn normalize_extension(extension: &str) -> String {
    let lowered = extension.trim().to_lowercase();
    if lowered.starts_with('.') {
        lowered
    } else {
        format!(".{lowered}")
    }
}

/// A set of lowercase, dot-prefixed file extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtensionSet(BTreeSet<String>);

impl ExtensionSet {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            extensions
                .into_iter()
                .map(|ext| normalize_extension(ext.as_ref()))
                .filter(|ext| ext.len() > 1)
                .collect(),
        )
    }

    pub fn video() -> Self {
        Self::new(VIDEO_EXTENSIONS)
    }

    pub fn audio() -> Self {
        Self::new(AUDIO_EXTENSIONS)
    }

    pub fn image() -> Self {
        Self::new(IMAGE_EXTENSIONS)
    }

    pub fn subtitle() -> Self {
        Self::new(SUBTITLE_EXTENSIONS)
    }

    pub fn union(&self, other: &ExtensionSet) -> Self {
        Self(self.0.union(&other.0).cloned().collect())
    }

    pub fn contains(&self, extension: &str) -> bool {
        self.0.contains(&normalize_extension(extension))
    }

    /// Case-insensitive check of the path's final extension.
    pub fn matches_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.contains(ext))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Knobs that shape a filesystem walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Follow symbolic links to files and directories.
    pub follow_symlinks: bool,
    /// Deepest directory level walked below a root, root children being
    /// level 1. `0` walks the whole tree.
    pub max_depth: u32,
    /// Glob patterns matched against directory names; matching directories
    /// are pruned with everything below them.
    pub exclude_patterns: Vec<String>,
    /// Visit dot-files and dot-directories.
    pub include_hidden: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            max_depth: 0,
            exclude_patterns: DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|pattern| pattern.to_string())
                .collect(),
            include_hidden: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_set_normalizes() {
        let set = ExtensionSet::new(["MKV", ".Mp4", "", "avi "]);
        assert!(set.contains(".mkv"));
        assert!(set.contains("mp4"));
        assert!(set.contains(".AVI"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn extension_sets_compose() {
        let combined = ExtensionSet::video().union(&ExtensionSet::subtitle());
        assert!(combined.contains(".mkv"));
        assert!(combined.contains(".srt"));
        assert!(!combined.contains(".mp3"));
        assert_eq!(
            combined.len(),
            VIDEO_EXTENSIONS.len() + SUBTITLE_EXTENSIONS.len()
        );
    }

    #[test]
    fn matches_path_is_case_insensitive() {
        let video = ExtensionSet::video();
        assert!(video.matches_path(Path::new("/media/Movie.MKV")));
        assert!(!video.matches_path(Path::new("/media/Movie.nfo")));
        assert!(!video.matches_path(Path::new("/media/mkv")));
    }

    #[test]
    fn known_extension_groups() {
        assert!(is_known_extension(".mkv"));
        assert!(is_known_extension("FLAC"));
        assert!(is_known_extension(".srt"));
        assert!(!is_known_extension(".2010"));
        assert!(!is_known_extension("nfo"));
    }

    #[test]
    fn default_options() {
        let options = ScanOptions::default();
        assert!(!options.follow_symlinks);
        assert_eq!(options.max_depth, 0);
        assert!(!options.include_hidden);
        assert!(options.exclude_patterns.iter().any(|p| p == "@eaDir"));
    }
}
