use std::path::PathBuf;

use thiserror::Error;

use crate::repr::RepresentationMode;

/// Failure reported by a codec engine, candidate or reference.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The compressor rejected its input or state.
    #[error("compress error: {0}")]
    Compress(String),

    /// The decompressor found malformed input.
    #[error("decompress error: {0}")]
    Decompress(String),

    /// Input ended before the stream terminator was seen.
    #[error("truncated stream: {0}")]
    Truncated(String),

    /// The option set asks for something the engine cannot honor.
    #[error("unsupported option: {0}")]
    Unsupported(String),
}

/// Errors raised while reading fixtures from disk.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("{msg}")]
    Io {
        msg: String,
        #[source]
        source: std::io::Error,
    },

    /// A `.compressed` fixture without its expected-plaintext sibling.
    #[error("missing expected fixture '{}' for sample \"{name}\"", path.display())]
    MissingExpected { name: String, path: PathBuf },

    /// File name is not valid UTF-8 and cannot become a corpus key.
    #[error("fixture name is not valid UTF-8: '{}'", .0.display())]
    InvalidName(PathBuf),
}

/// Failure of a harness entry point. Sample-scoped variants always name the
/// offending sample.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("fixture load failed: {0}")]
    Load(#[from] LoadError),

    /// The trusted streaming codec failed on a sample.
    #[error("Error in \"{sample}\" - reference codec failed: {source}")]
    Reference {
        sample: String,
        #[source]
        source: CodecError,
    },

    /// The codec under test failed on a sample.
    #[error("Error in \"{sample}\" - candidate {operation} failed ({mode}): {source}")]
    Candidate {
        sample: String,
        operation: &'static str,
        mode: RepresentationMode,
        #[source]
        source: CodecError,
    },

    /// Outputs differ in length or content.
    #[error("Error in \"{sample}\" - {left} result != {right} result ({mode})")]
    Mismatch {
        sample: String,
        left: &'static str,
        right: &'static str,
        mode: RepresentationMode,
    },

    /// Harness configuration could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl HarnessError {
    /// Name of the sample this failure belongs to, if any.
    pub fn sample(&self) -> Option<&str> {
        match self {
            HarnessError::Reference { sample, .. }
            | HarnessError::Candidate { sample, .. }
            | HarnessError::Mismatch { sample, .. } => Some(sample),
            HarnessError::Load(_) | HarnessError::Config(_) => None,
        }
    }
}
