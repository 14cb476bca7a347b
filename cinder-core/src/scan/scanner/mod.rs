pub mod filesystem;
pub mod settings;

pub use filesystem::FilesystemScanner;
pub use settings::{
    AUDIO_EXTENSIONS, DEFAULT_EXCLUDE_PATTERNS, ExtensionSet, IMAGE_EXTENSIONS, ScanOptions,
    SUBTITLE_EXTENSIONS, VIDEO_EXTENSIONS, is_known_extension,
};
