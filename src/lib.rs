//! Differential conformance harness for DEFLATE-family codecs.
//!
//! A candidate codec is checked against a trusted streaming reference:
//! compressed output must match byte for byte under both output
//! representations, and the candidate's own decompressor must round-trip
//! every sample and decode pre-built fixtures through both its
//! container-aware and raw entry points.
//!
//! All checks run strictly one at a time. The candidate's output layout is
//! chosen by a process-wide toggle ([`repr::set_mode`]); serial execution is
//! what keeps that toggle meaningful, so never run these checks from
//! parallel tests that share a candidate.

pub mod codec;
pub mod config;
pub mod corpus;
pub mod deflate_diff;
pub mod error;
pub mod flate;
pub mod inflate;
pub mod io_utils;
pub mod matrix;
pub mod options;
pub mod oracle;
pub mod queue;
pub mod repr;
pub mod stream;

pub use codec::{with_mode, CandidateCodec};
pub use config::HarnessConfig;
pub use corpus::{
    load_paired_corpus, load_plain_corpus, Corpus, ExternalSample, FixtureLayout, Sample,
};
pub use deflate_diff::compare_one;
pub use error::{CodecError, HarnessError, LoadError};
pub use flate::{FlateCandidate, FlateReference};
pub use inflate::{run_external, run_roundtrip};
pub use options::{OptionSet, Strategy};
pub use oracle::{equal, ByteSequence};
pub use repr::{OutputBuffer, RepresentationMode};
pub use stream::{run_reference, ReferenceFactory, ReferenceStream, StreamEvent};
