use tracing::debug;

use crate::codec::{with_mode, CandidateCodec};
use crate::corpus::Sample;
use crate::error::HarnessError;
use crate::options::OptionSet;
use crate::oracle;
use crate::repr::RepresentationMode;
use crate::stream::{run_reference, ReferenceFactory};

/// Compress one sample with the streaming reference and the one-shot
/// candidate and require identical bytes.
///
/// The reference receives window-normalized options; the candidate gets
/// `options` untouched. A reference failure is reported before the
/// candidate is ever called. The representation toggle is set to `mode`
/// right before the candidate call.
pub async fn compare_one<F, C>(
    factory: &F,
    candidate: &C,
    sample: &Sample,
    options: &OptionSet,
    mode: RepresentationMode,
) -> Result<(), HarnessError>
where
    F: ReferenceFactory + ?Sized,
    C: CandidateCodec + ?Sized,
{
    let reference_error = |source| HarnessError::Reference {
        sample: sample.name.clone(),
        source,
    };

    let stream = factory.create(&options.for_reference()).map_err(reference_error)?;
    let reference = run_reference(stream, &sample.content)
        .await
        .map_err(reference_error)?;

    let produced = with_mode(candidate, mode, |c| c.compress(&sample.content, options))
        .map_err(|source| HarnessError::Candidate {
            sample: sample.name.clone(),
            operation: "compress",
            mode,
            source,
        })?;

    oracle::expect_equal(
        &sample.name,
        "reference",
        "candidate",
        mode,
        &reference,
        &produced,
    )?;
    debug!(sample = %sample.name, %mode, bytes = reference.len(), "deflate outputs match");
    Ok(())
}
