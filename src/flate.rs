//! `flate2`-backed codec collaborators.
//!
//! [`FlateReference`] is a callback-driven streaming reference compressor,
//! [`FlateCandidate`] a one-shot codec that honors the representation toggle.
//! Both sit on the same engine, which always uses a 32 KiB window and has no
//! memory-level or strategy knobs; options asking for anything else are
//! rejected instead of silently ignored.

use std::io::Read;

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use crate::error::CodecError;
use crate::options::{OptionSet, Strategy};
use crate::repr::{self, OutputBuffer, RepresentationMode};
use crate::stream::{EventListener, ReferenceFactory, ReferenceStream, StreamEvent};

/// Default output chunk size of the chunked code paths.
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

const ENGINE_WINDOW_BITS: u32 = 15;
const ENGINE_MEM_LEVEL: u8 = 8;
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

fn chunk_size(options: &OptionSet) -> Result<usize, CodecError> {
    match options.chunk_size {
        None => Ok(DEFAULT_CHUNK_SIZE),
        Some(0) => Err(CodecError::Unsupported("chunk size must be positive".into())),
        Some(size) => Ok(size),
    }
}

fn engine_level(options: &OptionSet) -> Result<Compression, CodecError> {
    match options.level {
        None | Some(-1) => Ok(Compression::default()),
        Some(level @ 0..=9) => Ok(Compression::new(level as u32)),
        Some(level) => Err(CodecError::Unsupported(format!("compression level {level}"))),
    }
}

/// Reject deflate options the engine cannot reproduce.
fn check_deflate_options(options: &OptionSet) -> Result<Compression, CodecError> {
    if let Some(bits) = options.window_magnitude() {
        if bits != ENGINE_WINDOW_BITS {
            return Err(CodecError::Unsupported(format!("window bits {bits}")));
        }
    }
    if let Some(mem) = options.mem_level {
        if mem != ENGINE_MEM_LEVEL {
            return Err(CodecError::Unsupported(format!("memory level {mem}")));
        }
    }
    if let Some(strategy) = options.strategy {
        if strategy != Strategy::Default {
            return Err(CodecError::Unsupported(format!("strategy {strategy:?}")));
        }
    }
    engine_level(options)
}

/// Run the compressor over `input`, handing each filled output chunk to
/// `emit`. Without `finish` this returns once all input is absorbed.
fn pump_compress(
    engine: &mut Compress,
    mut input: &[u8],
    finish: bool,
    chunk_size: usize,
    emit: &mut dyn FnMut(Vec<u8>),
) -> Result<(), CodecError> {
    let flush = if finish {
        FlushCompress::Finish
    } else {
        FlushCompress::None
    };
    loop {
        let mut chunk = vec![0u8; chunk_size];
        let (in_before, out_before) = (engine.total_in(), engine.total_out());
        let status = engine
            .compress(input, &mut chunk, flush)
            .map_err(|e| CodecError::Compress(e.to_string()))?;
        let consumed = (engine.total_in() - in_before) as usize;
        let produced = (engine.total_out() - out_before) as usize;
        input = &input[consumed..];
        if produced > 0 {
            chunk.truncate(produced);
            emit(chunk);
        }
        match status {
            Status::StreamEnd => return Ok(()),
            _ if !finish && input.is_empty() && produced < chunk_size => return Ok(()),
            _ if consumed == 0 && produced == 0 => {
                return Err(CodecError::Compress("compressor made no progress".into()))
            }
            _ => {}
        }
    }
}

fn pump_decompress(
    engine: &mut Decompress,
    mut input: &[u8],
    chunk_size: usize,
    emit: &mut dyn FnMut(Vec<u8>),
) -> Result<(), CodecError> {
    loop {
        let mut chunk = vec![0u8; chunk_size];
        let (in_before, out_before) = (engine.total_in(), engine.total_out());
        let status = engine
            .decompress(input, &mut chunk, FlushDecompress::None)
            .map_err(|e| CodecError::Decompress(e.to_string()))?;
        let consumed = (engine.total_in() - in_before) as usize;
        let produced = (engine.total_out() - out_before) as usize;
        input = &input[consumed..];
        if produced > 0 {
            chunk.truncate(produced);
            emit(chunk);
        }
        match status {
            Status::StreamEnd => return Ok(()),
            _ if consumed == 0 && produced == 0 => {
                return Err(CodecError::Truncated("input ended before end of stream".into()))
            }
            _ => {}
        }
    }
}

/// Factory for streaming reference compressors.
///
/// Raw mode is a property of the factory, mirroring separate "deflate" and
/// "deflate raw" stream constructors; options must carry a positive window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlateReference {
    zlib_header: bool,
}

impl FlateReference {
    /// Streams wrapped in a zlib header and Adler-32 trailer.
    pub fn zlib() -> Self {
        Self { zlib_header: true }
    }

    /// Header-less deflate streams.
    pub fn raw() -> Self {
        Self { zlib_header: false }
    }

    /// Factory matching the container the options select.
    pub fn for_options(options: &OptionSet) -> Self {
        if options.is_raw() {
            Self::raw()
        } else {
            Self::zlib()
        }
    }
}

impl ReferenceFactory for FlateReference {
    type Stream = FlateDeflateStream;

    fn create(&self, options: &OptionSet) -> Result<FlateDeflateStream, CodecError> {
        if let Some(bits) = options.window_bits {
            if bits <= 0 {
                return Err(CodecError::Unsupported(format!(
                    "reference window bits must be positive, got {bits}"
                )));
            }
        }
        let level = check_deflate_options(options)?;
        Ok(FlateDeflateStream {
            engine: Compress::new(level, self.zlib_header),
            chunk_size: chunk_size(options)?,
            listener: None,
            closed: false,
        })
    }
}

/// Streaming deflate that reports through a listener.
pub struct FlateDeflateStream {
    engine: Compress,
    chunk_size: usize,
    listener: Option<EventListener>,
    closed: bool,
}

impl FlateDeflateStream {
    fn emit(&mut self, event: StreamEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener(event);
        }
    }

    fn pump(&mut self, input: &[u8], finish: bool) -> Result<(), CodecError> {
        let listener = &mut self.listener;
        pump_compress(&mut self.engine, input, finish, self.chunk_size, &mut |chunk| {
            if let Some(listener) = listener.as_mut() {
                listener(StreamEvent::Data(chunk));
            }
        })
    }

    fn fail(&mut self, err: CodecError) {
        self.closed = true;
        self.emit(StreamEvent::Error(err));
    }
}

impl ReferenceStream for FlateDeflateStream {
    fn subscribe(&mut self, listener: EventListener) {
        self.listener = Some(listener);
    }

    fn write(&mut self, data: &[u8]) {
        if self.closed {
            self.fail(CodecError::Compress("write after end".into()));
            return;
        }
        if let Err(err) = self.pump(data, false) {
            self.fail(err);
        }
    }

    fn end(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        match self.pump(&[], true) {
            Ok(()) => self.emit(StreamEvent::End),
            Err(err) => self.emit(StreamEvent::Error(err)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Zlib,
    Gzip,
    Raw,
}

fn inflate_container(data: &[u8], options: &OptionSet) -> Result<Container, CodecError> {
    if options.is_raw() {
        return Ok(Container::Raw);
    }
    match options.window_bits.unwrap_or(0) {
        0 | 32..=47 if data.starts_with(&GZIP_MAGIC) => Ok(Container::Gzip),
        0 | 8..=15 | 32..=47 => Ok(Container::Zlib),
        16..=31 => Ok(Container::Gzip),
        bits => Err(CodecError::Unsupported(format!("window bits {bits}"))),
    }
}

/// One-shot codec on `flate2`.
///
/// `Typed` output grows a single vector; `Untyped` output is the list of
/// fixed-size chunks the engine filled.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlateCandidate;

impl FlateCandidate {
    pub fn new() -> Self {
        Self
    }

    fn inflate(
        &self,
        data: &[u8],
        container: Container,
        options: &OptionSet,
    ) -> Result<OutputBuffer, CodecError> {
        let chunk_size = chunk_size(options)?;
        if container == Container::Gzip {
            let mut out = Vec::new();
            flate2::read::GzDecoder::new(data)
                .read_to_end(&mut out)
                .map_err(|e| CodecError::Decompress(e.to_string()))?;
            return Ok(match repr::mode() {
                RepresentationMode::Typed => OutputBuffer::Typed(out),
                RepresentationMode::Untyped => {
                    OutputBuffer::Untyped(out.chunks(chunk_size).map(<[u8]>::to_vec).collect())
                }
            });
        }

        let mut engine = Decompress::new(container == Container::Zlib);
        match repr::mode() {
            RepresentationMode::Typed => {
                let mut out = Vec::with_capacity(data.len().saturating_mul(2));
                let mut input = data;
                loop {
                    out.reserve(chunk_size);
                    let (in_before, out_before) = (engine.total_in(), engine.total_out());
                    let status = engine
                        .decompress_vec(input, &mut out, FlushDecompress::None)
                        .map_err(|e| CodecError::Decompress(e.to_string()))?;
                    let consumed = (engine.total_in() - in_before) as usize;
                    input = &input[consumed..];
                    match status {
                        Status::StreamEnd => return Ok(OutputBuffer::Typed(out)),
                        _ if consumed == 0 && engine.total_out() == out_before => {
                            return Err(CodecError::Truncated(
                                "input ended before end of stream".into(),
                            ));
                        }
                        _ => {}
                    }
                }
            }
            RepresentationMode::Untyped => {
                let mut chunks = Vec::new();
                pump_decompress(&mut engine, data, chunk_size, &mut |chunk| chunks.push(chunk))?;
                Ok(OutputBuffer::Untyped(chunks))
            }
        }
    }
}

impl crate::codec::CandidateCodec for FlateCandidate {
    fn compress(&self, data: &[u8], options: &OptionSet) -> Result<OutputBuffer, CodecError> {
        let level = check_deflate_options(options)?;
        let chunk_size = chunk_size(options)?;
        let mut engine = Compress::new(level, !options.is_raw());
        match repr::mode() {
            RepresentationMode::Typed => {
                let mut out = Vec::with_capacity(data.len() / 2 + 64);
                let mut input = data;
                loop {
                    out.reserve(chunk_size);
                    let (in_before, out_before) = (engine.total_in(), engine.total_out());
                    let status = engine
                        .compress_vec(input, &mut out, FlushCompress::Finish)
                        .map_err(|e| CodecError::Compress(e.to_string()))?;
                    let consumed = (engine.total_in() - in_before) as usize;
                    input = &input[consumed..];
                    match status {
                        Status::StreamEnd => return Ok(OutputBuffer::Typed(out)),
                        _ if consumed == 0 && engine.total_out() == out_before => {
                            return Err(CodecError::Compress("compressor made no progress".into()))
                        }
                        _ => {}
                    }
                }
            }
            RepresentationMode::Untyped => {
                let mut chunks = Vec::new();
                pump_compress(&mut engine, data, true, chunk_size, &mut |chunk| {
                    chunks.push(chunk)
                })?;
                Ok(OutputBuffer::Untyped(chunks))
            }
        }
    }

    fn decompress(&self, data: &[u8], options: &OptionSet) -> Result<OutputBuffer, CodecError> {
        let container = inflate_container(data, options)?;
        self.inflate(data, container, options)
    }

    fn decompress_raw(&self, data: &[u8], options: &OptionSet) -> Result<OutputBuffer, CodecError> {
        self.inflate(data, Container::Raw, options)
    }
}
