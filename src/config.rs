use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::corpus::{self, Corpus, ExternalSample, FixtureLayout, Sample};
use crate::error::{HarnessError, LoadError};
use crate::options::OptionSet;

/// Runtime configuration for a conformance run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Directory of plain samples.
    pub samples_dir: PathBuf,
    /// Directory of paired `.compressed` / `.data` fixtures.
    pub raw_samples_dir: PathBuf,
    /// Fixture naming rules.
    pub layout: FixtureLayout,
    /// Option sets swept by the deflate matrix.
    pub option_sets: Vec<OptionSet>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            samples_dir: PathBuf::from("tests/fixtures/samples"),
            raw_samples_dir: PathBuf::from("tests/fixtures/samples_deflated_raw"),
            layout: FixtureLayout::default(),
            option_sets: Vec::new(),
        }
    }
}

impl HarnessConfig {
    /// Parse a JSON config file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, HarnessError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            HarnessError::Config(crate::io_utils::format_io_error("reading config", path, &e))
        })?;
        serde_json::from_str(&text)
            .map_err(|e| HarnessError::Config(format!("invalid config '{}': {e}", path.display())))
    }

    pub fn load_samples(&self) -> Result<Corpus<Sample>, LoadError> {
        corpus::load_plain_corpus_with(&self.samples_dir, &self.layout)
    }

    pub fn load_raw_samples(&self) -> Result<Corpus<ExternalSample>, LoadError> {
        corpus::load_paired_corpus_with(&self.raw_samples_dir, &self.layout)
    }
}
