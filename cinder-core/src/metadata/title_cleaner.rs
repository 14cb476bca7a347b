//! Removes scene release noise from a raw filename fragment.
//!
//! Release names put quality, codec, group and service tags after the title,
//! so the first whole-word marker found is treated as the split point and
//! everything from there on is dropped.

/// Resolution, source, codec, audio and release flags. Ordinary words that
/// show up in real titles (`Proper`, `Internal`, `Atmos`, ...) are left out.
const QUALITY_MARKERS: &[&str] = &[
    "2160p", "1440p", "1080p", "1080i", "720p", "576p", "480p", "4K", "UHD", "BluRay", "Blu-Ray",
    "BDRip", "BRRip", "BDRemux", "REMUX", "WEB-DL", "WEBDL", "WEBRip", "HDTV", "PDTV", "SDTV",
    "DVDRip", "DVDScr", "DVD5", "DVD9", "HDRip", "HDR", "HDR10", "HDR10+", "DoVi", "SDR", "x264",
    "x265", "H264", "H265", "HEVC", "AVC", "XviD", "DivX", "10bit", "8bit", "AAC", "AC3", "EAC3",
    "DDP", "DD5", "DTS", "DTS-HD", "TrueHD", "FLAC", "REPACK",
];

/// Well known release group tags. Groups named after plain words (`EVO`,
/// `FLUX`, `SPARKS`, ...) are not listed.
const RELEASE_GROUPS: &[&str] = &[
    "YIFY", "YTS", "RARBG", "FGT", "ETRG", "NTb", "NTG", "CMRG", "TEPES", "KOGi", "GalaxyRG", "QxR",
    "TGx", "EZTV", "ION10",
];

/// Streaming service source tags.
const STREAMING_SERVICES: &[&str] = &[
    "AMZN", "NF", "DSNP", "HMAX", "ATVP", "HULU", "PCOK", "PMTP", "CRAV",
];

/// Strip release noise from `raw`, returning a space separated title.
///
/// Dots and underscores become spaces, the string is cut at the first
/// whole-word marker from each list in turn, and whitespace is collapsed.
/// Bare years are left alone; callers that know about years extract them
/// before cleaning.
pub fn clean_title(raw: &str) -> String {
    let mut title = raw.replace(['.', '_'], " ");

    for markers in [QUALITY_MARKERS, RELEASE_GROUPS, STREAMING_SERVICES] {
        if let Some(cut) = earliest_marker(&title, markers) {
            title.truncate(cut);
        }
    }

    collapse_whitespace(&title)
}

/// Collapse runs of whitespace into single spaces and trim both ends.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Byte offset of the first release marker in `raw`, from any list.
///
/// Offsets are valid for `raw` itself since the separator rewrite in
/// [`clean_title`] never changes byte lengths.
pub(crate) fn first_marker_offset(raw: &str) -> Option<usize> {
    let spaced = raw.replace(['.', '_'], " ");
    [QUALITY_MARKERS, RELEASE_GROUPS, STREAMING_SERVICES]
        .into_iter()
        .filter_map(|markers| earliest_marker(&spaced, markers))
        .min()
}

fn earliest_marker(haystack: &str, markers: &[&str]) -> Option<usize> {
    markers
        .iter()
        .filter_map(|marker| find_whole_word(haystack, marker))
        .min()
}

/// Case-insensitive search for `token` that only accepts matches not glued
/// to an alphanumeric character on either side. A rejected match resumes the
/// search one byte further on, so every candidate position is visited once.
///
/// `token` must be ASCII; that guarantees every match starts and ends on a
/// char boundary of `haystack`.
fn find_whole_word(haystack: &str, token: &str) -> Option<usize> {
    debug_assert!(token.is_ascii());

    let hay = haystack.as_bytes();
    let needle = token.as_bytes();
    if needle.is_empty() || needle.len() > hay.len() {
        return None;
    }

    let mut from = 0;
    while from + needle.len() <= hay.len() {
        let offset = hay[from..]
            .windows(needle.len())
            .position(|window| window.eq_ignore_ascii_case(needle))?;
        let start = from + offset;
        let end = start + needle.len();

        let clear_before = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|ch| !ch.is_alphanumeric());
        let clear_after = haystack[end..]
            .chars()
            .next()
            .is_none_or(|ch| !ch.is_alphanumeric());

        if clear_before && clear_after {
            return Some(start);
        }
        from = start + 1;
    }

    None
}
