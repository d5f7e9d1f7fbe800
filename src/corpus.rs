//! Fixture corpus loading.
//!
//! Directory entries are visited in lexicographic file-name order so that
//! iteration and failure reporting are reproducible. Each call re-reads the
//! disk; nothing is cached.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::LoadError;
use crate::io_utils::{load_io_error, read_fixture};

/// Naming rules for fixture directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureLayout {
    /// Samples whose name starts with this character are disabled.
    pub exclusion_marker: char,
    /// Extension of pre-compressed fixtures (without the dot).
    pub compressed_extension: String,
    /// Extension of the expected plaintext sibling (without the dot).
    pub expected_extension: String,
}

impl Default for FixtureLayout {
    fn default() -> Self {
        Self {
            exclusion_marker: '_',
            compressed_extension: "compressed".to_owned(),
            expected_extension: "data".to_owned(),
        }
    }
}

impl FixtureLayout {
    pub fn is_excluded(&self, name: &str) -> bool {
        name.starts_with(self.exclusion_marker)
    }
}

/// A named plain sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub name: String,
    pub content: Vec<u8>,
}

impl Sample {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// A pre-compressed fixture paired with its expected plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalSample {
    pub name: String,
    pub content: Vec<u8>,
    pub expected: Vec<u8>,
}

/// Common view over corpus entries.
pub trait Fixture {
    fn name(&self) -> &str;
    fn digest_into(&self, hasher: &mut Sha256);
}

fn digest_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

impl Fixture for Sample {
    fn name(&self) -> &str {
        &self.name
    }

    fn digest_into(&self, hasher: &mut Sha256) {
        digest_field(hasher, self.name.as_bytes());
        digest_field(hasher, &self.content);
    }
}

impl Fixture for ExternalSample {
    fn name(&self) -> &str {
        &self.name
    }

    fn digest_into(&self, hasher: &mut Sha256) {
        digest_field(hasher, self.name.as_bytes());
        digest_field(hasher, &self.content);
        digest_field(hasher, &self.expected);
    }
}

/// Read-only mapping from sample name to fixture, iterated by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus<T> {
    entries: BTreeMap<String, T>,
}

impl<T> Default for Corpus<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: Fixture> Corpus<T> {
    /// Files are visited in name order, so of two files sharing a stem the
    /// later one wins.
    fn insert(&mut self, entry: T, path: &Path) {
        if self.entries.insert(entry.name().to_owned(), entry).is_some() {
            debug!(path = %path.display(), "fixture replaces an earlier file of the same name");
        }
    }

    /// Hex SHA-256 over every entry in corpus order.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for entry in self.entries.values() {
            entry.digest_into(&mut hasher);
        }
        hex::encode(hasher.finalize())
    }
}

impl<T> Corpus<T> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }
}

/// Build an in-memory corpus. A later entry replaces an earlier one with the
/// same name.
impl<T: Fixture> FromIterator<T> for Corpus<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|entry| (entry.name().to_owned(), entry))
            .collect();
        Self { entries }
    }
}

/// Regular files of `dir`, sorted by file name.
fn sorted_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let reader = fs::read_dir(dir).map_err(|e| load_io_error("listing fixtures in", dir, e))?;
    let mut files = Vec::new();
    for entry in reader {
        let entry = entry.map_err(|e| load_io_error("listing fixtures in", dir, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| load_io_error("inspecting", &entry.path(), e))?;
        if file_type.is_dir() {
            continue;
        }
        files.push(entry.path());
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// File name without its last extension.
fn fixture_name(path: &Path) -> Result<String, LoadError> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_owned)
        .ok_or_else(|| LoadError::InvalidName(path.to_path_buf()))
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

/// Load every plain sample in `dir` with the default layout.
pub fn load_plain_corpus<P: AsRef<Path>>(dir: P) -> Result<Corpus<Sample>, LoadError> {
    load_plain_corpus_with(dir.as_ref(), &FixtureLayout::default())
}

pub fn load_plain_corpus_with(
    dir: &Path,
    layout: &FixtureLayout,
) -> Result<Corpus<Sample>, LoadError> {
    let mut corpus = Corpus::default();
    for path in sorted_files(dir)? {
        let name = fixture_name(&path)?;
        if layout.is_excluded(&name) {
            debug!(sample = %name, "fixture disabled");
            continue;
        }
        let content = read_fixture(&path)?;
        corpus.insert(Sample { name, content }, &path);
    }
    debug!(dir = %dir.display(), samples = corpus.len(), "loaded plain corpus");
    Ok(corpus)
}

/// Load paired `.compressed` / `.data` fixtures in `dir` with the default
/// layout.
pub fn load_paired_corpus<P: AsRef<Path>>(dir: P) -> Result<Corpus<ExternalSample>, LoadError> {
    load_paired_corpus_with(dir.as_ref(), &FixtureLayout::default())
}

pub fn load_paired_corpus_with(
    dir: &Path,
    layout: &FixtureLayout,
) -> Result<Corpus<ExternalSample>, LoadError> {
    let mut corpus = Corpus::default();
    for path in sorted_files(dir)? {
        if !has_extension(&path, &layout.compressed_extension) {
            continue;
        }
        let name = fixture_name(&path)?;
        if layout.is_excluded(&name) {
            debug!(sample = %name, "fixture disabled");
            continue;
        }
        let expected_path = dir.join(format!("{name}.{}", layout.expected_extension));
        let expected = match fs::read(&expected_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(LoadError::MissingExpected {
                    name,
                    path: expected_path,
                })
            }
            Err(e) => return Err(load_io_error("reading fixture", &expected_path, e)),
        };
        let content = read_fixture(&path)?;
        corpus.insert(
            ExternalSample {
                name,
                content,
                expected,
            },
            &path,
        );
    }
    debug!(dir = %dir.display(), samples = corpus.len(), "loaded paired corpus");
    Ok(corpus)
}
