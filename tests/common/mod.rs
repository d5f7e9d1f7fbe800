#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use deflate_parity::{
    repr, CandidateCodec, CodecError, FlateCandidate, OptionSet, OutputBuffer, RepresentationMode,
};

static TOGGLE: Mutex<()> = Mutex::new(());

/// Serialize tests that read or write the representation toggle.
pub fn toggle_lock() -> MutexGuard<'static, ()> {
    TOGGLE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn write_fixture(dir: &Path, file: &str, bytes: &[u8]) {
    std::fs::write(dir.join(file), bytes).unwrap();
}

/// Raw deflate encoding built outside the harness.
pub fn raw_deflate(data: &[u8]) -> Vec<u8> {
    use std::io::Write;
    let mut enc = flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

/// Candidate wrapper that records which mode each call observed and can
/// damage its compressed output.
#[derive(Default)]
pub struct RecordingCandidate {
    pub inner: FlateCandidate,
    pub calls: RefCell<Vec<(&'static str, usize, RepresentationMode)>>,
    pub corrupt_sample_len: Option<usize>,
}

impl RecordingCandidate {
    pub fn corrupting(len: usize) -> Self {
        Self {
            corrupt_sample_len: Some(len),
            ..Self::default()
        }
    }

    pub fn modes(&self, op: &str) -> Vec<RepresentationMode> {
        self.calls
            .borrow()
            .iter()
            .filter(|(name, _, _)| *name == op)
            .map(|(_, _, mode)| *mode)
            .collect()
    }

    fn record(&self, op: &'static str, len: usize) {
        self.calls.borrow_mut().push((op, len, repr::mode()));
    }
}

impl CandidateCodec for RecordingCandidate {
    fn compress(&self, data: &[u8], options: &OptionSet) -> Result<OutputBuffer, CodecError> {
        self.record("compress", data.len());
        let out = self.inner.compress(data, options)?;
        if self.corrupt_sample_len == Some(data.len()) {
            let mut bytes = out.into_vec();
            let last = bytes.len() - 1;
            bytes[last] ^= 0x01;
            return Ok(OutputBuffer::Typed(bytes));
        }
        Ok(out)
    }

    fn decompress(&self, data: &[u8], options: &OptionSet) -> Result<OutputBuffer, CodecError> {
        self.record("decompress", data.len());
        self.inner.decompress(data, options)
    }

    fn decompress_raw(&self, data: &[u8], options: &OptionSet) -> Result<OutputBuffer, CodecError> {
        self.record("decompress_raw", data.len());
        self.inner.decompress_raw(data, options)
    }
}
