//! Scan domain modules.
//!
//! Folder discovery and the options that shape it. Parsing is delegated to a
//! [`FileParser`](crate::metadata::FileParser) chosen by the caller.

pub mod scanner;

pub use scanner::*;
