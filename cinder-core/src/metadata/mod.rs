//! Filename parsing: title cleaning plus per content type parsers.

pub mod filename_parser;
pub mod title_cleaner;

pub use filename_parser::{
    FileParser, MAX_YEAR, MIN_YEAR, MovieFileParser, is_plausible_year, strip_media_extension,
};
pub use title_cleaner::{clean_title, collapse_whitespace};
