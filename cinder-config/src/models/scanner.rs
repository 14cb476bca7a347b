use anyhow::{Context, anyhow};
use cinder_core::{ExtensionSet, FileParser, MovieFileParser, ScanOptions, TvFileParser};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub const CONFIG_PATH_ENV: &str = "CINDER_SCANNER_CONFIG_PATH";
pub const CONFIG_JSON_ENV: &str = "CINDER_SCANNER_CONFIG_JSON";

const DEFAULT_FILES: &[&str] = &["cinder.toml", "config/cinder.toml", "cinder.json"];

/// Source that produced the scanner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScannerConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

/// Which filename parser a scan runs with.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Movie,
    #[serde(alias = "tvshow", alias = "series")]
    #[value(alias = "tvshow")]
    Tv,
}

impl ContentType {
    /// Build the parser for this content type, optionally restricted to a
    /// custom extension set.
    pub fn parser(self, extensions: Option<ExtensionSet>) -> Box<dyn FileParser> {
        match (self, extensions) {
            (ContentType::Movie, Some(set)) => Box::new(MovieFileParser::with_extensions(set)),
            (ContentType::Movie, None) => Box::new(MovieFileParser::new()),
            (ContentType::Tv, Some(set)) => Box::new(TvFileParser::with_extensions(set)),
            (ContentType::Tv, None) => Box::new(TvFileParser::new()),
        }
    }
}

/// Scanner settings. Every field is optional in the file; missing ones fall
/// back to the core defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Directories scanned when none are given on the command line.
    pub roots: Vec<PathBuf>,
    pub content_type: ContentType,
    /// Follow symbolic links. Off by default so a link loop cannot make a
    /// scan revisit the same tree.
    pub follow_symlinks: bool,
    /// Deepest directory level below a root, `0` for no limit.
    pub max_depth: u32,
    /// Directory name globs pruned from the walk. Replaces the built-in list
    /// when present.
    pub exclude_patterns: Vec<String>,
    pub include_hidden: bool,
    /// Restrict the parser to these extensions instead of its own set.
    pub extensions: Option<Vec<String>>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        let options = ScanOptions::default();
        Self {
            roots: Vec::new(),
            content_type: ContentType::default(),
            follow_symlinks: options.follow_symlinks,
            max_depth: options.max_depth,
            exclude_patterns: options.exclude_patterns,
            include_hidden: options.include_hidden,
            extensions: None,
        }
    }
}

impl ScannerConfig {
    /// Load scanner configuration using environment variables.
    /// Evaluation order:
    /// 1) `$CINDER_SCANNER_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$CINDER_SCANNER_CONFIG_JSON` (inline JSON),
    /// 3) the first of `cinder.toml`, `config/cinder.toml`, `cinder.json`
    ///    in the working directory,
    /// 4) defaults.
    pub fn load_from_env() -> anyhow::Result<(Self, ScannerConfigSource)> {
        Self::load_with(|key| env::var(key).ok(), Path::new("."))
    }

    /// [`load_from_env`](Self::load_from_env) with the variable lookup and the
    /// directory searched for default files supplied by the caller.
    pub fn load_with<F>(lookup: F, base_dir: &Path) -> anyhow::Result<(Self, ScannerConfigSource)>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path_str) = lookup(CONFIG_PATH_ENV)
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str.trim());
            let config = Self::load_from_file(&path)?;
            return Ok((config, ScannerConfigSource::EnvPath(path)));
        }

        if let Some(raw) = lookup(CONFIG_JSON_ENV)
            && !raw.trim().is_empty()
        {
            let parsed = Self::parse_json(&raw)
                .with_context(|| format!("failed to parse {CONFIG_JSON_ENV}"))?;
            return Ok((parsed, ScannerConfigSource::EnvInline));
        }

        if let Some(path) = Self::find_default_file(base_dir) {
            let config = Self::load_from_file(&path)?;
            return Ok((config, ScannerConfigSource::File(path)));
        }

        Ok((Self::default(), ScannerConfigSource::Default))
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scanner config from {}", path.display()))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents)
                .with_context(|| format!("invalid scanner config {}", path.display())),
            Some("toml") => toml::from_str(&contents)
                .map_err(|err| anyhow!("invalid scanner config {}: {}", path.display(), err)),
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    /// Try TOML first, then JSON.
    pub fn parse_from_str(contents: &str, origin: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse scanner config {}: toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).map_err(|err| anyhow!("invalid scanner config json: {err}"))
    }

    fn find_default_file(base_dir: &Path) -> Option<PathBuf> {
        DEFAULT_FILES
            .iter()
            .map(|candidate| base_dir.join(candidate))
            .find(|path| path.is_file())
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            follow_symlinks: self.follow_symlinks,
            max_depth: self.max_depth,
            exclude_patterns: self.exclude_patterns.clone(),
            include_hidden: self.include_hidden,
        }
    }

    pub fn extension_set(&self) -> Option<ExtensionSet> {
        self.extensions.as_ref().map(ExtensionSet::new)
    }

    pub fn parser(&self) -> Box<dyn FileParser> {
        self.content_type.parser(self.extension_set())
    }
}
