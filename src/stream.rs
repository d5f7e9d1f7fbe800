//! Driver for callback-style streaming reference codecs.
//!
//! A reference stream accepts `write`/`end` calls and reports back through a
//! listener: zero or more `Data` events, then exactly one `End` or `Error`.
//! [`run_reference`] turns that into a single future that resolves once with
//! the concatenated output.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use tracing::debug;

use crate::error::CodecError;
use crate::options::OptionSet;

/// Signal emitted by a reference stream.
#[derive(Debug)]
pub enum StreamEvent {
    Data(Vec<u8>),
    End,
    Error(CodecError),
}

pub type EventListener = Box<dyn FnMut(StreamEvent)>;

/// A streaming compressor that reports progress through callbacks.
pub trait ReferenceStream {
    /// Register the listener that receives every subsequent event.
    fn subscribe(&mut self, listener: EventListener);
    fn write(&mut self, data: &[u8]);
    /// Signal end of input.
    fn end(&mut self);
}

/// Builds reference streams from (already normalized) options.
pub trait ReferenceFactory {
    type Stream: ReferenceStream;

    fn create(&self, options: &OptionSet) -> Result<Self::Stream, CodecError>;
}

impl<F, S> ReferenceFactory for F
where
    F: Fn(&OptionSet) -> Result<S, CodecError>,
    S: ReferenceStream,
{
    type Stream = S;

    fn create(&self, options: &OptionSet) -> Result<S, CodecError> {
        self(options)
    }
}

/// Lifecycle of one reference run as seen by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Idle,
    Writing,
    Ended,
    Errored,
}

type Completion = oneshot::Sender<Result<Vec<u8>, CodecError>>;

struct Collector {
    state: StreamState,
    chunks: Vec<Vec<u8>>,
    done: Option<Completion>,
}

impl Collector {
    fn new(done: Completion) -> Self {
        Self {
            state: StreamState::Idle,
            chunks: Vec::new(),
            done: Some(done),
        }
    }

    fn on_event(&mut self, event: StreamEvent) {
        if matches!(self.state, StreamState::Ended | StreamState::Errored) {
            debug!(?event, "reference event after completion ignored");
            return;
        }
        match event {
            StreamEvent::Data(chunk) => self.chunks.push(chunk),
            StreamEvent::End => {
                self.state = StreamState::Ended;
                let output = std::mem::take(&mut self.chunks).concat();
                self.resolve(Ok(output));
            }
            StreamEvent::Error(err) => {
                self.state = StreamState::Errored;
                self.chunks.clear();
                self.resolve(Err(err));
            }
        }
    }

    fn resolve(&mut self, outcome: Result<Vec<u8>, CodecError>) {
        if let Some(done) = self.done.take() {
            // The receiver only goes away if the driver future was dropped.
            let _ = done.send(outcome);
        }
    }
}

/// Feed `data` to `stream` in one write, end it, and wait for completion.
///
/// Chunks are concatenated in arrival order. An `Error` event fails the run
/// and discards any partial output. A stream that releases its listener
/// without a terminal event is reported as truncated.
pub async fn run_reference<S: ReferenceStream>(
    mut stream: S,
    data: &[u8],
) -> Result<Vec<u8>, CodecError> {
    let (tx, rx) = oneshot::channel();
    let collector = Rc::new(RefCell::new(Collector::new(tx)));
    let sink = Rc::clone(&collector);
    stream.subscribe(Box::new(move |event| sink.borrow_mut().on_event(event)));

    collector.borrow_mut().state = StreamState::Writing;
    stream.write(data);
    if collector.borrow().state == StreamState::Writing {
        stream.end();
    }
    drop(collector);

    let outcome = rx.await.unwrap_or_else(|_| {
        Err(CodecError::Truncated(
            "reference stream closed without end or error".into(),
        ))
    });
    drop(stream);
    outcome
}
