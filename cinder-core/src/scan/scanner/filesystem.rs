use std::fs;
use std::io;
use std::path::Path;

use glob::{MatchOptions, Pattern};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use super::settings::ScanOptions;
use crate::error::{InvalidPattern, Result, RootError, ScanError};
use crate::metadata::FileParser;
use crate::types::{ScanReport, ScanResult};

const NO_TITLE: &str = "could not isolate a title";

const EXCLUDE_MATCH: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Walks root directories and runs every media file through a parser.
///
/// The walk is synchronous; async callers should move it onto a blocking
/// thread. Cancellation is polled between roots and between entries.
#[derive(Debug)]
pub struct FilesystemScanner<P> {
    parser: P,
    options: ScanOptions,
    excludes: Vec<Pattern>,
}

impl<P: FileParser> FilesystemScanner<P> {
    pub fn new(parser: P, options: ScanOptions) -> std::result::Result<Self, InvalidPattern> {
        let excludes = options
            .exclude_patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|source| InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            parser,
            options,
            excludes,
        })
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scan every root in order.
    ///
    /// Roots that cannot be opened are recorded in [`ScanReport::errors`] and
    /// skipped. Unreadable entries below a root are skipped silently.
    /// Cancellation returns [`ScanError::Cancelled`] holding what was
    /// collected up to that point.
    pub fn scan<I>(&self, roots: I, cancel: &CancellationToken) -> Result<ScanReport>
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
    {
        let mut report = ScanReport::default();

        for root in roots {
            if cancel.is_cancelled() {
                return Err(cancelled(report));
            }
            self.scan_root(root.as_ref(), cancel, &mut report)?;
        }

        info!(
            total = report.stats.total_files,
            media = report.stats.media_files,
            skipped = report.stats.skipped_files,
            parsed = report.stats.parsed_files,
            failed = report.stats.failed_parses,
            root_errors = report.errors.len(),
            content_type = self.parser.content_type(),
            "scan finished"
        );

        Ok(report)
    }

    fn scan_root(
        &self,
        root: &Path,
        cancel: &CancellationToken,
        report: &mut ScanReport,
    ) -> std::result::Result<(), ScanError> {
        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());

        if let Err(source) = fs::metadata(&root) {
            warn!(root = %root.display(), error = %source, "cannot open scan root");
            report.errors.push(RootError { root, source });
            return Ok(());
        }

        debug!(root = %root.display(), "scanning root");
        let before = report.results.len();

        let mut walker = WalkDir::new(&root).follow_links(self.options.follow_symlinks);
        if self.options.max_depth > 0 {
            // files sit one level below the deepest walked directory
            walker = walker.max_depth(self.options.max_depth as usize + 1);
        }

        for entry in walker.into_iter().filter_entry(|entry| self.should_enter(entry)) {
            if cancel.is_cancelled() {
                // take the report so the caller gets the partial results
                return Err(cancelled(std::mem::take(report)));
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    let source = root_io_error(err);
                    warn!(root = %root.display(), error = %source, "cannot read scan root");
                    report.errors.push(RootError {
                        root: root.clone(),
                        source,
                    });
                    continue;
                }
                Err(err) => {
                    debug!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }
            self.visit_file(&entry, report);
        }

        debug!(
            root = %root.display(),
            found = report.results.len() - before,
            "root scanned"
        );
        Ok(())
    }

    /// Directory pruning. The root itself is always entered.
    fn should_enter(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }

        let name = entry.file_name().to_string_lossy();
        if !self.options.include_hidden && is_hidden(&name) {
            return false;
        }
        if let Some(pattern) = self
            .excludes
            .iter()
            .find(|pattern| pattern.matches_with(&name, EXCLUDE_MATCH))
        {
            debug!(dir = %entry.path().display(), pattern = %pattern, "excluded directory");
            return false;
        }
        true
    }

    fn visit_file(&self, entry: &DirEntry, report: &mut ScanReport) {
        let stats = &mut report.stats;
        stats.total_files += 1;

        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().into_owned();

        if !self.options.include_hidden && is_hidden(&file_name) {
            stats.skipped_files += 1;
            return;
        }
        if !self.parser.supported_extensions().matches_path(path) {
            stats.skipped_files += 1;
            return;
        }
        if entry.path_is_symlink() && !self.options.follow_symlinks {
            debug!(path = %path.display(), "skipping symlink");
            stats.skipped_files += 1;
            return;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => {
                stats.skipped_files += 1;
                return;
            }
            Err(err) => {
                debug!(path = %path.display(), error = %err, "cannot stat file");
                stats.skipped_files += 1;
                return;
            }
        };

        stats.media_files += 1;
        let (parsed_title, hints) = self.parser.parse_path(path);
        let error = if parsed_title.is_empty() {
            stats.failed_parses += 1;
            debug!(path = %path.display(), "no title parsed");
            Some(NO_TITLE.to_string())
        } else {
            stats.parsed_files += 1;
            None
        };

        report.results.push(ScanResult {
            file_path: path.to_path_buf(),
            file_name,
            file_size: metadata.len(),
            parsed_title,
            hints,
            is_media: true,
            error,
        });
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn cancelled(report: ScanReport) -> ScanError {
    info!(
        total = report.stats.total_files,
        results = report.results.len(),
        "scan cancelled"
    );
    ScanError::Cancelled {
        partial: Box::new(report),
    }
}

fn root_io_error(err: walkdir::Error) -> io::Error {
    let message = err.to_string();
    err.into_io_error()
        .unwrap_or_else(|| io::Error::other(message))
}
