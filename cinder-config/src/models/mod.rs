pub mod scanner;

pub use scanner::{ContentType, ScannerConfig, ScannerConfigSource};
