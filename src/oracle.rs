//! Byte-exact comparison of codec outputs.
//!
//! The oracle only sees a length and a byte iterator, so outputs produced
//! under different representation modes compare the same way.

use tracing::{debug, Level};

use crate::error::HarnessError;
use crate::repr::{OutputBuffer, RepresentationMode};

/// Anything that can be viewed as an ordered run of bytes.
pub trait ByteSequence {
    fn byte_len(&self) -> usize;
    fn bytes(&self) -> impl Iterator<Item = u8> + '_;
}

impl ByteSequence for [u8] {
    fn byte_len(&self) -> usize {
        self.len()
    }

    fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.iter().copied()
    }
}

impl ByteSequence for Vec<u8> {
    fn byte_len(&self) -> usize {
        self.len()
    }

    fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.iter().copied()
    }
}

impl<const N: usize> ByteSequence for [u8; N] {
    fn byte_len(&self) -> usize {
        N
    }

    fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.iter().copied()
    }
}

impl ByteSequence for OutputBuffer {
    fn byte_len(&self) -> usize {
        self.len()
    }

    fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        let (flat, chunks): (&[u8], &[Vec<u8>]) = match self {
            OutputBuffer::Typed(bytes) => (bytes.as_slice(), &[]),
            OutputBuffer::Untyped(chunks) => (&[], chunks.as_slice()),
        };
        flat.iter()
            .copied()
            .chain(chunks.iter().flat_map(|c| c.iter().copied()))
    }
}

impl<T: ByteSequence + ?Sized> ByteSequence for &T {
    fn byte_len(&self) -> usize {
        (**self).byte_len()
    }

    fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        (**self).bytes()
    }
}

/// Exact, order-sensitive equality. Length mismatch short-circuits.
pub fn equal<A, B>(a: &A, b: &B) -> bool
where
    A: ByteSequence + ?Sized,
    B: ByteSequence + ?Sized,
{
    if a.byte_len() != b.byte_len() {
        return false;
    }
    a.bytes().zip(b.bytes()).all(|(x, y)| x == y)
}

/// Index of the first differing byte. When one sequence is a prefix of the
/// other this is the shorter length.
pub fn first_mismatch<A, B>(a: &A, b: &B) -> Option<usize>
where
    A: ByteSequence + ?Sized,
    B: ByteSequence + ?Sized,
{
    let mut index = 0;
    let mut left = a.bytes();
    let mut right = b.bytes();
    loop {
        match (left.next(), right.next()) {
            (None, None) => return None,
            (Some(x), Some(y)) if x == y => index += 1,
            _ => return Some(index),
        }
    }
}

/// Hex dump of up to `radius` bytes on either side of `pos`.
pub fn hex_window<A: ByteSequence + ?Sized>(seq: &A, pos: usize, radius: usize) -> String {
    let start = pos.saturating_sub(radius);
    let window: Vec<u8> = seq.bytes().skip(start).take(radius * 2 + 1).collect();
    hex::encode(window)
}

/// Compare `expected` with `actual` and turn a difference into a mismatch
/// error naming `sample`. Byte-level detail goes to the debug log only.
pub fn expect_equal<A, B>(
    sample: &str,
    left: &'static str,
    right: &'static str,
    mode: RepresentationMode,
    expected: &A,
    actual: &B,
) -> Result<(), HarnessError>
where
    A: ByteSequence + ?Sized,
    B: ByteSequence + ?Sized,
{
    if equal(expected, actual) {
        return Ok(());
    }
    if tracing::enabled!(Level::DEBUG) {
        let position = first_mismatch(expected, actual).unwrap_or(0);
        debug!(
            sample,
            %mode,
            position,
            expected_len = expected.byte_len(),
            actual_len = actual.byte_len(),
            expected = %hex_window(expected, position, 8),
            actual = %hex_window(actual, position, 8),
            "byte mismatch"
        );
    }
    Err(HarnessError::Mismatch {
        sample: sample.to_owned(),
        left,
        right,
        mode,
    })
}
