use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::title_cleaner::{clean_title, first_marker_offset};
use crate::scan::scanner::settings::{ExtensionSet, is_known_extension};
use crate::types::{Hints, hint_keys};

/// Years outside this range are treated as part of the title.
pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

static PAREN_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+?)\s*\(\s*(\d{4})\s*\)").expect("valid parenthesised year regex")
});

/// Turns a media filename into a title plus typed hints.
///
/// Parsers never fail: a name nothing can be made of yields an empty title
/// and no hints, and it is up to the caller to decide what that means.
pub trait FileParser: Send + Sync {
    fn parse(&self, filename: &str) -> (String, Hints);

    /// Parse with the full path available. The default only looks at the
    /// final component.
    fn parse_path(&self, path: &Path) -> (String, Hints) {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        self.parse(&file_name)
    }

    fn supported_extensions(&self) -> &ExtensionSet;

    /// Content kind tag, e.g. `"movie"` or `"tvshow"`.
    fn content_type(&self) -> &'static str;
}

impl<P: FileParser + ?Sized> FileParser for Box<P> {
    fn parse(&self, filename: &str) -> (String, Hints) {
        (**self).parse(filename)
    }

    fn parse_path(&self, path: &Path) -> (String, Hints) {
        (**self).parse_path(path)
    }

    fn supported_extensions(&self) -> &ExtensionSet {
        (**self).supported_extensions()
    }

    fn content_type(&self) -> &'static str {
        (**self).content_type()
    }
}

impl<P: FileParser + ?Sized> FileParser for Arc<P> {
    fn parse(&self, filename: &str) -> (String, Hints) {
        (**self).parse(filename)
    }

    fn parse_path(&self, path: &Path) -> (String, Hints) {
        (**self).parse_path(path)
    }

    fn supported_extensions(&self) -> &ExtensionSet {
        (**self).supported_extensions()
    }

    fn content_type(&self) -> &'static str {
        (**self).content_type()
    }
}

/// Drop the final extension when it is a known media extension.
/// `Movie.2010` keeps its year.
pub fn strip_media_extension(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() && is_known_extension(extension) => stem,
        _ => filename,
    }
}

pub fn is_plausible_year(year: i32) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year)
}

/// Clean `raw` and trim leftover separator characters off both ends.
pub(crate) fn tidy_title(raw: &str) -> String {
    clean_title(raw)
        .trim_matches(|ch: char| ch == '-' || ch.is_whitespace())
        .to_string()
}

/// Movie filenames: `Title (YYYY)`, `Title.YYYY.quality...` or a bare title.
#[derive(Debug, Clone)]
pub struct MovieFileParser {
    extensions: ExtensionSet,
}

impl Default for MovieFileParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MovieFileParser {
    pub fn new() -> Self {
        Self::with_extensions(ExtensionSet::video())
    }

    pub fn with_extensions(extensions: ExtensionSet) -> Self {
        Self { extensions }
    }

    fn parse_parenthesised(name: &str) -> Option<(String, i32)> {
        let captures = PAREN_YEAR.captures(name)?;
        let year = captures.get(2)?.as_str().parse::<i32>().ok()?;
        if !is_plausible_year(year) {
            return None;
        }
        let title = tidy_title(captures.get(1)?.as_str());
        (!title.is_empty()).then_some((title, year))
    }

    /// `Title<sep>YYYY` where the year is followed by a separator or the end
    /// of the name. When several candidates exist the last one in front of
    /// the first release marker wins, which keeps numeric titles such as
    /// `Blade.Runner.2049.2017` intact.
    fn parse_separated(name: &str) -> Option<(String, i32)> {
        let bytes = name.as_bytes();
        let limit = first_marker_offset(name).unwrap_or(bytes.len());
        let mut best = None;

        for (index, &byte) in bytes.iter().enumerate() {
            if index == 0 || index >= limit || !is_separator(byte) {
                continue;
            }
            let digits = index + 1..index + 5;
            let Some(candidate) = bytes.get(digits.clone()) else {
                break;
            };
            if !candidate.iter().all(u8::is_ascii_digit) {
                continue;
            }
            if bytes
                .get(digits.end)
                .is_some_and(|&next| !is_year_terminator(next))
            {
                continue;
            }
            let Ok(year) = name[digits].parse::<i32>() else {
                continue;
            };
            if is_plausible_year(year) {
                best = Some((index, year));
            }
        }

        let (index, year) = best?;
        let title = tidy_title(&name[..index]);
        (!title.is_empty()).then_some((title, year))
    }
}

fn is_separator(byte: u8) -> bool {
    matches!(byte, b' ' | b'.' | b'_')
}

fn is_year_terminator(byte: u8) -> bool {
    matches!(byte, b' ' | b'.' | b'_' | b'-' | b'[' | b']' | b'(' | b')')
}

impl FileParser for MovieFileParser {
    fn parse(&self, filename: &str) -> (String, Hints) {
        let name = strip_media_extension(filename);
        let mut hints = Hints::new();

        if let Some((title, year)) =
            Self::parse_parenthesised(name).or_else(|| Self::parse_separated(name))
        {
            hints.insert(hint_keys::YEAR, year);
            return (title, hints);
        }

        (tidy_title(name), hints)
    }

    fn supported_extensions(&self) -> &ExtensionSet {
        &self.extensions
    }

    fn content_type(&self) -> &'static str {
        "movie"
    }
}
