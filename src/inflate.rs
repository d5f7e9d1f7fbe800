//! Decompression checks driven by the candidate alone.

use tracing::{debug, info};

use crate::codec::{with_mode, CandidateCodec};
use crate::corpus::{Corpus, ExternalSample, Sample};
use crate::error::{CodecError, HarnessError};
use crate::options::OptionSet;
use crate::oracle;
use crate::repr::RepresentationMode;

fn candidate_error<'a>(
    sample: &'a str,
    operation: &'static str,
    mode: RepresentationMode,
) -> impl FnOnce(CodecError) -> HarnessError + 'a {
    move |source| HarnessError::Candidate {
        sample: sample.to_owned(),
        operation,
        mode,
        source,
    }
}

/// Compress each sample with the candidate (typed), then decompress it
/// under untyped and again under typed, requiring the original bytes back
/// both times.
///
/// `deflate_options` must request a real container; `inflate_options`
/// normally leaves the window unset so the decoder reads it from the
/// header. Stops at the first failing sample.
pub fn run_roundtrip<C>(
    corpus: &Corpus<Sample>,
    candidate: &C,
    inflate_options: &OptionSet,
    deflate_options: &OptionSet,
) -> Result<(), HarnessError>
where
    C: CandidateCodec + ?Sized,
{
    for sample in corpus.iter() {
        let name = sample.name.as_str();
        let deflated = with_mode(candidate, RepresentationMode::Typed, |c| {
            c.compress(&sample.content, deflate_options)
        })
        .map_err(candidate_error(name, "compress", RepresentationMode::Typed))?;
        let deflated = deflated.as_contiguous();

        for mode in [RepresentationMode::Untyped, RepresentationMode::Typed] {
            let inflated =
                with_mode(candidate, mode, |c| c.decompress(&deflated, inflate_options))
                    .map_err(candidate_error(name, "decompress", mode))?;
            oracle::expect_equal(
                name,
                "inflate",
                "original",
                mode,
                &sample.content,
                &inflated,
            )?;
        }
        debug!(sample = name, deflated = deflated.len(), "roundtrip ok");
    }
    info!(samples = corpus.len(), "inflate roundtrip passed");
    Ok(())
}

/// Decompress pre-built fixtures through both the container-aware and the
/// raw entry point; each must reproduce the expected plaintext.
///
/// The toggle is pinned to typed for these calls so no earlier test's
/// setting leaks in.
pub fn run_external<C>(
    corpus: &Corpus<ExternalSample>,
    candidate: &C,
    inflate_options: &OptionSet,
) -> Result<(), HarnessError>
where
    C: CandidateCodec + ?Sized,
{
    let mode = RepresentationMode::Typed;
    for sample in corpus.iter() {
        let name = sample.name.as_str();

        let inflated = with_mode(candidate, mode, |c| {
            c.decompress(&sample.content, inflate_options)
        })
        .map_err(candidate_error(name, "decompress", mode))?;
        oracle::expect_equal(
            name,
            "inflate",
            "original",
            mode,
            &sample.expected,
            &inflated,
        )?;

        let inflated = with_mode(candidate, mode, |c| {
            c.decompress_raw(&sample.content, inflate_options)
        })
        .map_err(candidate_error(name, "decompress_raw", mode))?;
        oracle::expect_equal(
            name,
            "inflate raw",
            "original",
            mode,
            &sample.expected,
            &inflated,
        )?;

        debug!(sample = name, "external fixture ok");
    }
    info!(samples = corpus.len(), "external inflate passed");
    Ok(())
}
