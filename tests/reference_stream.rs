use std::cell::{Cell, RefCell};
use std::io::Read;
use std::rc::Rc;

use deflate_parity::stream::EventListener;
use deflate_parity::{
    run_reference, CodecError, OptionSet, ReferenceFactory, ReferenceStream, StreamEvent,
};
use deflate_parity::FlateReference;
use futures::executor::block_on;

/// Stream that replays canned events on write and end.
#[derive(Default)]
struct Scripted {
    listener: Option<EventListener>,
    on_write: Vec<StreamEvent>,
    on_end: Vec<StreamEvent>,
    release_on_end: bool,
    writes: Rc<RefCell<Vec<Vec<u8>>>>,
    ended: Rc<Cell<bool>>,
}

impl Scripted {
    fn fire(&mut self, events: Vec<StreamEvent>) {
        for event in events {
            if let Some(listener) = self.listener.as_mut() {
                listener(event);
            }
        }
    }
}

impl ReferenceStream for Scripted {
    fn subscribe(&mut self, listener: EventListener) {
        self.listener = Some(listener);
    }

    fn write(&mut self, data: &[u8]) {
        self.writes.borrow_mut().push(data.to_vec());
        let events = std::mem::take(&mut self.on_write);
        self.fire(events);
    }

    fn end(&mut self) {
        self.ended.set(true);
        let events = std::mem::take(&mut self.on_end);
        self.fire(events);
        if self.release_on_end {
            self.listener = None;
        }
    }
}

#[test]
fn chunks_are_concatenated_in_arrival_order() {
    let writes = Rc::new(RefCell::new(Vec::new()));
    let stream = Scripted {
        on_write: vec![StreamEvent::Data(vec![1, 2])],
        on_end: vec![StreamEvent::Data(vec![3]), StreamEvent::Data(vec![4, 5]), StreamEvent::End],
        writes: Rc::clone(&writes),
        ..Scripted::default()
    };
    let out = block_on(run_reference(stream, b"input")).unwrap();
    assert_eq!(out, vec![1, 2, 3, 4, 5]);
    assert_eq!(*writes.borrow(), vec![b"input".to_vec()]);
}

#[test]
fn error_event_fails_and_discards_output() {
    let stream = Scripted {
        on_end: vec![
            StreamEvent::Data(vec![1]),
            StreamEvent::Error(CodecError::Compress("boom".into())),
        ],
        ..Scripted::default()
    };
    let err = block_on(run_reference(stream, b"x")).unwrap_err();
    assert!(matches!(err, CodecError::Compress(ref msg) if msg == "boom"));
}

#[test]
fn error_during_write_skips_end() {
    let ended = Rc::new(Cell::new(false));
    let stream = Scripted {
        on_write: vec![StreamEvent::Error(CodecError::Compress("bad input".into()))],
        on_end: vec![StreamEvent::End],
        ended: Rc::clone(&ended),
        ..Scripted::default()
    };
    assert!(block_on(run_reference(stream, b"x")).is_err());
    assert!(!ended.get());
}

#[test]
fn events_after_completion_are_ignored() {
    let stream = Scripted {
        on_end: vec![
            StreamEvent::Data(vec![7]),
            StreamEvent::End,
            StreamEvent::Data(vec![8]),
            StreamEvent::Error(CodecError::Compress("late".into())),
            StreamEvent::End,
        ],
        ..Scripted::default()
    };
    assert_eq!(block_on(run_reference(stream, b"x")).unwrap(), vec![7]);
}

#[test]
fn stream_released_without_terminal_event_is_truncated() {
    let stream = Scripted {
        on_end: vec![StreamEvent::Data(vec![1])],
        release_on_end: true,
        ..Scripted::default()
    };
    let err = block_on(run_reference(stream, b"x")).unwrap_err();
    assert!(matches!(err, CodecError::Truncated(_)));
}

fn zlib_inflate(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    flate2::read::ZlibDecoder::new(data).read_to_end(&mut out).unwrap();
    out
}

#[test]
fn flate_reference_produces_valid_zlib() {
    let input = b"the quick brown fox jumps over the lazy dog. ".repeat(40);
    let stream = FlateReference::zlib().create(&OptionSet::default()).unwrap();
    let out = block_on(run_reference(stream, &input)).unwrap();
    assert_eq!(out[0], 0x78);
    assert_eq!(zlib_inflate(&out), input);
}

#[test]
fn flate_reference_output_does_not_depend_on_chunk_size() {
    let input: Vec<u8> = (0..5000u32).map(|i| (i * 31 % 253) as u8).collect();
    let whole = block_on(run_reference(
        FlateReference::raw().create(&OptionSet::default()).unwrap(),
        &input,
    ))
    .unwrap();
    let small = block_on(run_reference(
        FlateReference::raw()
            .create(&OptionSet::default().with_chunk_size(7))
            .unwrap(),
        &input,
    ))
    .unwrap();
    assert_eq!(whole, small);
}

#[test]
fn flate_reference_requires_positive_window() {
    let raw_opts = OptionSet::default().with_window_bits(-15);
    let err = FlateReference::raw().create(&raw_opts).err().unwrap();
    assert!(matches!(err, CodecError::Unsupported(_)));
    assert!(FlateReference::raw().create(&raw_opts.for_reference()).is_ok());
}

#[test]
fn flate_reference_rejects_options_it_cannot_honor() {
    for opts in [
        OptionSet::default().with_window_bits(9),
        OptionSet::default().with_level(11),
        OptionSet {
            mem_level: Some(1),
            ..OptionSet::default()
        },
    ] {
        let err = FlateReference::zlib().create(&opts).err().unwrap();
        assert!(matches!(err, CodecError::Unsupported(_)), "{opts:?}");
    }
}

#[test]
fn closures_act_as_factories() {
    let created = Cell::new(0);
    let factory = |opts: &OptionSet| {
        created.set(created.get() + 1);
        FlateReference::zlib().create(opts)
    };
    let stream = factory.create(&OptionSet::default()).unwrap();
    let out = block_on(run_reference(stream, b"abc")).unwrap();
    assert_eq!(zlib_inflate(&out), b"abc");
    assert_eq!(created.get(), 1);
}
