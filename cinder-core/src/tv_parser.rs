use std::path::{Component, Path};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::trace;

use crate::metadata::filename_parser::{
    FileParser, is_plausible_year, strip_media_extension, tidy_title,
};
use crate::scan::scanner::settings::ExtensionSet;
use crate::types::{Hints, hint_keys};

static SEASON_EPISODE_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)s(\d{1,2})e(\d{1,3})(?:e(\d{1,3}))?").expect("valid SxxEyy regex")
});

static SEASON_EPISODE_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)season\s*(\d{1,2})\s*episode\s*(\d{1,3})").expect("valid word-form regex")
});

static AIR_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\D)(\d{4})[.\-](\d{2})[.\-](\d{2})(?:\D|$)").expect("valid air date regex")
});

// Single digit season, two digit episode, e.g. `1.01` or `3-12`
static LEGACY_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[\s._\-])(\d)[.\-](\d{2})(?:[\s._\-]|$)").expect("valid legacy code regex")
});

static TRAILING_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+?)[\s._]*\(\s*(\d{4})\s*\)[\s._\-]*$").expect("valid trailing year regex")
});

static SEASON_FOLDERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Season 01, Season.1, Season01
        r"(?i)^season[\s._\-]*(\d{1,3})$",
        // S01, S1
        r"(?i)^s(\d{1,2})$",
        // Series 1 (British convention)
        r"(?i)^series[\s._\-]*(\d{1,3})$",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("valid season folder regex"))
    .collect()
});

/// TV episode filenames.
///
/// Patterns are tried in a fixed order: `SxxEyy[Ezz]`, `Season N Episode M`,
/// daily `YYYY.MM.DD`, and finally the legacy `N.NN` form, which is the most
/// prone to false positives. A name matching none of them is cleaned as a
/// whole and carries no hints.
#[derive(Debug, Clone)]
pub struct TvFileParser {
    extensions: ExtensionSet,
}

impl Default for TvFileParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TvFileParser {
    pub fn new() -> Self {
        Self::with_extensions(ExtensionSet::video())
    }

    pub fn with_extensions(extensions: ExtensionSet) -> Self {
        Self { extensions }
    }

    /// Season number for folders like `Season 1`, `S02`, `Series 3` or
    /// `Specials` (season 0).
    pub fn parse_season_folder(folder_name: &str) -> Option<u32> {
        let name = folder_name.trim();
        if name.eq_ignore_ascii_case("specials") || name.eq_ignore_ascii_case("special") {
            return Some(0);
        }

        SEASON_FOLDERS
            .iter()
            .find_map(|pattern| pattern.captures(name))
            .and_then(|captures| captures.get(1)?.as_str().parse().ok())
    }

    /// Split a trailing `(YYYY)` off `raw`, returning the remaining name and
    /// the year. Implausible years leave `raw` untouched.
    fn split_trailing_year(raw: &str) -> Option<(&str, i32)> {
        let captures = TRAILING_YEAR.captures(raw)?;
        let year = captures.get(2)?.as_str().parse().ok()?;
        if !is_plausible_year(year) {
            return None;
        }
        Some((captures.get(1)?.as_str(), year))
    }

    fn parse_code(name: &str, captures: &Captures<'_>, hints: &mut Hints) -> String {
        let Some(code) = captures.get(0) else {
            return String::new();
        };

        if let Some(season) = number(captures, 1) {
            hints.insert(hint_keys::SEASON, season);
        }
        if let Some(episode) = number(captures, 2) {
            hints.insert(hint_keys::EPISODE, episode);
        }
        if let Some(end_episode) = number(captures, 3) {
            hints.insert(hint_keys::END_EPISODE, end_episode);
        }

        let episode_title = tidy_title(
            name[code.end()..].trim_start_matches(|ch: char| {
                ch.is_whitespace() || matches!(ch, '.' | '-' | '_')
            }),
        );
        if !episode_title.is_empty() {
            hints.insert(hint_keys::EPISODE_TITLE, episode_title);
        }

        let raw_title = &name[..code.start()];
        match Self::split_trailing_year(raw_title) {
            Some((series, year)) => {
                hints.insert(hint_keys::SERIES_YEAR, year);
                tidy_title(series)
            }
            None => tidy_title(raw_title),
        }
    }

    fn parse_words(name: &str, captures: &Captures<'_>, hints: &mut Hints) -> String {
        if let Some(season) = number(captures, 1) {
            hints.insert(hint_keys::SEASON, season);
        }
        if let Some(episode) = number(captures, 2) {
            hints.insert(hint_keys::EPISODE, episode);
        }
        prefix_title(name, captures)
    }

    /// Only calendar-valid dates count; `2024.13.45` falls through.
    fn parse_air_date(name: &str, hints: &mut Hints) -> Option<String> {
        let captures = AIR_DATE.captures(name)?;
        let year = number(&captures, 1)?;
        let month = number(&captures, 2)?;
        let day = number(&captures, 3)?;
        NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)?;

        hints.insert(hint_keys::AIR_YEAR, year);
        hints.insert(hint_keys::AIR_MONTH, month);
        hints.insert(hint_keys::AIR_DAY, day);
        hints.insert(hint_keys::IS_DAILY, true);
        // group 0 may have swallowed the separator in front of the year
        Some(tidy_title(&name[..captures.get(1)?.start()]))
    }

    /// Fill gaps in a filename parse from the directories above the file.
    ///
    /// The closest season folder supplies `season` and marks its parent as
    /// the series folder. Without one, the immediate parent is taken as the
    /// series folder, but only fills an empty title. Values already present
    /// are never replaced.
    fn apply_directory_context(path: &Path, title: &mut String, hints: &mut Hints) {
        let Some(parent) = path.parent() else {
            return;
        };
        let folders: Vec<String> = parent
            .components()
            .rev()
            .filter_map(|component| match component {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        let season_folder = folders
            .iter()
            .enumerate()
            .find_map(|(index, folder)| Some((index, Self::parse_season_folder(folder)?)));

        match season_folder {
            Some((index, season)) => {
                if hints.insert_if_absent(hint_keys::SEASON, season) {
                    trace!(season, "season taken from folder name");
                }
                if let Some(series_folder) = folders.get(index + 1) {
                    let replace = title.is_empty() || is_numeric_code(title);
                    Self::apply_series_folder(series_folder, title, hints, replace, 1);
                }
            }
            None => {
                if let Some(series_folder) = folders.first() {
                    let replace = title.is_empty();
                    Self::apply_series_folder(series_folder, title, hints, replace, 3);
                }
            }
        }
    }

    fn apply_series_folder(
        folder: &str,
        title: &mut String,
        hints: &mut Hints,
        replace_title: bool,
        min_len: usize,
    ) {
        let (name, year) = match Self::split_trailing_year(folder) {
            Some((name, year)) => (name, Some(year)),
            None => (folder, None),
        };

        let series = tidy_title(name);
        if series.chars().count() < min_len {
            return;
        }

        if let Some(year) = year {
            hints.insert_if_absent(hint_keys::SERIES_YEAR, year);
        }
        if replace_title {
            trace!(series = %series, "series title taken from folder name");
            *title = series;
        }
    }
}

fn number(captures: &Captures<'_>, group: usize) -> Option<u32> {
    captures.get(group)?.as_str().parse().ok()
}

fn prefix_title(name: &str, captures: &Captures<'_>) -> String {
    captures
        .get(0)
        .map(|m| tidy_title(&name[..m.start()]))
        .unwrap_or_default()
}

fn is_numeric_code(title: &str) -> bool {
    !title.is_empty()
        && title
            .chars()
            .all(|ch| ch.is_ascii_digit() || ch.is_whitespace())
}

impl FileParser for TvFileParser {
    fn parse(&self, filename: &str) -> (String, Hints) {
        let name = strip_media_extension(filename);
        let mut hints = Hints::new();

        if let Some(captures) = SEASON_EPISODE_CODE.captures(name) {
            let title = Self::parse_code(name, &captures, &mut hints);
            return (title, hints);
        }

        if let Some(captures) = SEASON_EPISODE_WORDS.captures(name) {
            let title = Self::parse_words(name, &captures, &mut hints);
            return (title, hints);
        }

        if let Some(title) = Self::parse_air_date(name, &mut hints) {
            return (title, hints);
        }

        if let Some(captures) = LEGACY_CODE.captures(name) {
            let title = Self::parse_words(name, &captures, &mut hints);
            return (title, hints);
        }

        (tidy_title(name), hints)
    }

    fn parse_path(&self, path: &Path) -> (String, Hints) {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        let (mut title, mut hints) = self.parse(&file_name);
        Self::apply_directory_context(path, &mut title, &mut hints);
        (title, hints)
    }

    fn supported_extensions(&self) -> &ExtensionSet {
        &self.extensions
    }

    fn content_type(&self) -> &'static str {
        "tvshow"
    }
}
