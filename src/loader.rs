use std::io::Read;
use std::path::{Path, PathBuf};

use crate::env::TargetEnv;
use crate::error::Error;
use crate::model::{Entry, KeyParsingMode, LoadOutcome, LoadReport};
use crate::parser::parse_str_with_source;

const DEFAULT_FILE: &str = ".env";

/// Load `.env` from the current working directory into the process
/// environment, capturing any failure in the returned outcome.
///
/// # Safety
///
/// See [`load_dotenv`].
pub unsafe fn dotenv() -> Result<LoadOutcome, Error> {
    unsafe { load_dotenv(DEFAULT_FILE, false) }
}

/// Load a dotenv file into the process environment.
///
/// With `verbose` off, a failure is returned as [`LoadOutcome::Failed`] and
/// this function always returns `Ok`. With `verbose` on, it is returned as
/// `Err` instead.
///
/// # Safety
///
/// This mutates the process environment. The caller must ensure no other
/// threads concurrently read or write the process environment.
pub unsafe fn load_dotenv(path: impl AsRef<Path>, verbose: bool) -> Result<LoadOutcome, Error> {
    let target = unsafe { TargetEnv::process() };
    EnvLoader::new()
        .path(path)
        .verbose(verbose)
        .target(target)
        .load()
}

/// Builder-style dotenv loader.
///
/// The default target is an in-memory map; pass [`TargetEnv::process`] to
/// write to the process environment.
#[derive(Debug, Clone)]
pub struct EnvLoader {
    path: PathBuf,
    override_existing: bool,
    verbose: bool,
    key_parsing_mode: KeyParsingMode,
    target: TargetEnv,
}

impl EnvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = path.as_ref().to_path_buf();
        self
    }

    pub fn override_existing(mut self, override_existing: bool) -> Self {
        self.override_existing = override_existing;
        self
    }

    /// Propagate load failures as `Err` instead of capturing them.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn key_parsing_mode(mut self, key_parsing_mode: KeyParsingMode) -> Self {
        self.key_parsing_mode = key_parsing_mode;
        self
    }

    pub fn target(mut self, target: TargetEnv) -> Self {
        self.target = target;
        self
    }

    pub fn target_env(&self) -> &TargetEnv {
        &self.target
    }

    pub fn into_target(self) -> TargetEnv {
        self.target
    }

    /// Read and parse the configured file without touching the target.
    pub fn parse_only(&self) -> Result<Vec<Entry>, Error> {
        self.read_entries()
    }

    /// Load the configured file into the target.
    pub fn load(&mut self) -> Result<LoadOutcome, Error> {
        let result = self.read_entries().map(|entries| self.apply(entries));
        self.finish(result)
    }

    /// Load dotenv text from `reader` instead of the configured path.
    pub fn load_from_reader<R: Read>(&mut self, mut reader: R) -> Result<LoadOutcome, Error> {
        let mut bytes = Vec::new();
        let result = reader
            .read_to_end(&mut bytes)
            .map_err(Error::from)
            .and_then(|_| self.parse_bytes(&bytes, None))
            .map(|entries| self.apply(entries));
        self.finish(result)
    }

    fn read_entries(&self) -> Result<Vec<Entry>, Error> {
        if self.path.as_os_str().is_empty() {
            return Err(Error::EmptyPath);
        }

        tracing::debug!(path = %self.path.display(), "loading dotenv file");
        let bytes = std::fs::read(&self.path).map_err(|source| Error::FileAccess {
            path: self.path.clone(),
            source,
        })?;
        self.parse_bytes(&bytes, Some(&self.path))
    }

    fn parse_bytes(&self, bytes: &[u8], source: Option<&Path>) -> Result<Vec<Entry>, Error> {
        let content = std::str::from_utf8(bytes)?;
        let entries = parse_str_with_source(content, source, self.key_parsing_mode)?;
        Ok(entries)
    }

    fn apply(&mut self, entries: Vec<Entry>) -> LoadReport {
        let mut report = LoadReport::default();

        for entry in entries {
            if !self.override_existing && self.target.has_value(&entry.key) {
                report.skipped_existing += 1;
                tracing::debug!(key = %entry.key, "skipping existing key");
                continue;
            }

            tracing::trace!(key = %entry.key, line = entry.line, "setting variable");
            self.target.set_var(&entry.key, &entry.value);
            report.loaded += 1;
        }

        tracing::debug!(
            loaded = report.loaded,
            skipped_existing = report.skipped_existing,
            "dotenv entries applied"
        );
        report
    }

    fn finish(&self, result: Result<LoadReport, Error>) -> Result<LoadOutcome, Error> {
        match result {
            Ok(report) => Ok(LoadOutcome::Loaded(report)),
            Err(err) if self.verbose => Err(err),
            Err(err) => {
                tracing::debug!(error = %err, "dotenv load failed, keeping existing environment");
                Ok(LoadOutcome::Failed(err))
            }
        }
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_FILE),
            override_existing: true,
            verbose: false,
            key_parsing_mode: KeyParsingMode::default(),
            target: TargetEnv::memory(),
        }
    }
}
