//! Process-wide output representation switch.
//!
//! The candidate codec picks its output buffer layout from a global flag
//! instead of an argument. The flag is mutable, unscoped and order-sensitive:
//! whatever was written last is what the next candidate call observes.
//! Harness code therefore sets it immediately before every candidate call
//! and never runs two such calls concurrently.

use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Buffer layout the candidate codec must produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepresentationMode {
    /// One contiguous byte buffer.
    Typed,
    /// A list of chunks as produced by the engine.
    Untyped,
}

impl RepresentationMode {
    /// Order in which the matrix runner visits modes for one sample.
    pub const ALL: [RepresentationMode; 2] =
        [RepresentationMode::Untyped, RepresentationMode::Typed];

    /// The other mode.
    pub fn opposite(self) -> Self {
        match self {
            RepresentationMode::Typed => RepresentationMode::Untyped,
            RepresentationMode::Untyped => RepresentationMode::Typed,
        }
    }
}

impl fmt::Display for RepresentationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepresentationMode::Typed => f.write_str("typed"),
            RepresentationMode::Untyped => f.write_str("untyped"),
        }
    }
}

const TYPED: u8 = 1;
const UNTYPED: u8 = 0;

static MODE: AtomicU8 = AtomicU8::new(TYPED);

/// Select the representation observed by subsequent candidate calls.
pub fn set_mode(mode: RepresentationMode) {
    let raw = match mode {
        RepresentationMode::Typed => TYPED,
        RepresentationMode::Untyped => UNTYPED,
    };
    MODE.store(raw, Ordering::SeqCst);
}

/// Currently selected representation.
pub fn mode() -> RepresentationMode {
    match MODE.load(Ordering::SeqCst) {
        UNTYPED => RepresentationMode::Untyped,
        _ => RepresentationMode::Typed,
    }
}

/// Codec output in one of the two representations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputBuffer {
    Typed(Vec<u8>),
    Untyped(Vec<Vec<u8>>),
}

impl OutputBuffer {
    pub fn representation(&self) -> RepresentationMode {
        match self {
            OutputBuffer::Typed(_) => RepresentationMode::Typed,
            OutputBuffer::Untyped(_) => RepresentationMode::Untyped,
        }
    }

    /// Logical length in bytes.
    pub fn len(&self) -> usize {
        match self {
            OutputBuffer::Typed(bytes) => bytes.len(),
            OutputBuffer::Untyped(chunks) => chunks.iter().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Logical bytes as one slice. Borrows when already contiguous.
    pub fn as_contiguous(&self) -> Cow<'_, [u8]> {
        match self {
            OutputBuffer::Typed(bytes) => Cow::Borrowed(bytes),
            OutputBuffer::Untyped(chunks) if chunks.len() == 1 => Cow::Borrowed(&chunks[0]),
            OutputBuffer::Untyped(chunks) => Cow::Owned(chunks.concat()),
        }
    }

    pub fn into_vec(self) -> Vec<u8> {
        match self {
            OutputBuffer::Typed(bytes) => bytes,
            OutputBuffer::Untyped(chunks) => chunks.concat(),
        }
    }
}
