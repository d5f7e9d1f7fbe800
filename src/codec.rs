use crate::error::CodecError;
use crate::options::OptionSet;
use crate::repr::{self, OutputBuffer, RepresentationMode};

/// The one-shot codec under test.
///
/// Output layout follows the process-wide representation toggle rather than
/// an argument, so every call must be preceded by
/// [`CandidateCodec::set_representation_mode`]. Use [`with_mode`] to keep the
/// two steps together.
pub trait CandidateCodec {
    fn compress(&self, data: &[u8], options: &OptionSet) -> Result<OutputBuffer, CodecError>;

    /// Container-aware decompression.
    fn decompress(&self, data: &[u8], options: &OptionSet) -> Result<OutputBuffer, CodecError>;

    /// Header-less decompression.
    fn decompress_raw(&self, data: &[u8], options: &OptionSet) -> Result<OutputBuffer, CodecError>;

    fn set_representation_mode(&self, mode: RepresentationMode) {
        repr::set_mode(mode);
    }
}

impl<C: CandidateCodec + ?Sized> CandidateCodec for &C {
    fn compress(&self, data: &[u8], options: &OptionSet) -> Result<OutputBuffer, CodecError> {
        (**self).compress(data, options)
    }

    fn decompress(&self, data: &[u8], options: &OptionSet) -> Result<OutputBuffer, CodecError> {
        (**self).decompress(data, options)
    }

    fn decompress_raw(&self, data: &[u8], options: &OptionSet) -> Result<OutputBuffer, CodecError> {
        (**self).decompress_raw(data, options)
    }

    fn set_representation_mode(&self, mode: RepresentationMode) {
        (**self).set_representation_mode(mode)
    }
}

/// Set the representation toggle and immediately run `call` against the
/// candidate. Nothing may run between the two steps.
pub fn with_mode<C, T>(candidate: &C, mode: RepresentationMode, call: impl FnOnce(&C) -> T) -> T
where
    C: CandidateCodec + ?Sized,
{
    candidate.set_representation_mode(mode);
    call(candidate)
}
