pub mod scan;

pub use scan::{HintValue, Hints, ScanReport, ScanResult, ScanStats, hint_keys};
