mod common;

use std::fs;

use common::{fixtures_dir, write_fixture};
use deflate_parity::corpus::{load_paired_corpus_with, load_plain_corpus_with};
use deflate_parity::{
    load_paired_corpus, load_plain_corpus, Corpus, FixtureLayout, LoadError, Sample,
};

#[test]
fn plain_corpus_strips_extension_and_skips_marked_files() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "b.txt", b"bee");
    write_fixture(dir.path(), "a.bin", &[0, 1, 2]);
    write_fixture(dir.path(), "_skipme.bin", b"disabled");
    write_fixture(dir.path(), "archive.tar.gz", b"tgz");

    let corpus = load_plain_corpus(dir.path()).unwrap();
    assert_eq!(corpus.names().collect::<Vec<_>>(), vec!["a", "archive.tar", "b"]);
    assert!(!corpus.contains("_skipme"));
    assert_eq!(corpus.get("a").unwrap().content, vec![0, 1, 2]);
    assert_eq!(corpus.get("b").unwrap().content, b"bee".to_vec());
}

#[test]
fn plain_corpus_skips_directories() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "one.txt", b"1");
    fs::create_dir(dir.path().join("nested")).unwrap();
    write_fixture(&dir.path().join("nested"), "two.txt", b"2");

    let corpus = load_plain_corpus(dir.path()).unwrap();
    assert_eq!(corpus.names().collect::<Vec<_>>(), vec!["one"]);
}

#[test]
fn loading_is_deterministic_and_rereads_disk() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "x.txt", b"first");
    write_fixture(dir.path(), "y.txt", b"second");

    let first = load_plain_corpus(dir.path()).unwrap();
    let second = load_plain_corpus(dir.path()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.fingerprint(), second.fingerprint());

    write_fixture(dir.path(), "y.txt", b"changed");
    let third = load_plain_corpus(dir.path()).unwrap();
    assert_eq!(third.get("y").unwrap().content, b"changed".to_vec());
    assert_ne!(first.fingerprint(), third.fingerprint());
}

#[test]
fn later_file_wins_on_shared_stem() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "x.txt", b"text");
    write_fixture(dir.path(), "x.bin", b"binary");

    let corpus = load_plain_corpus(dir.path()).unwrap();
    assert_eq!(corpus.len(), 1);
    assert_eq!(corpus.get("x").unwrap().content, b"text");

    let built: Corpus<Sample> =
        [Sample::new("x", b"binary".to_vec()), Sample::new("x", b"text".to_vec())]
            .into_iter()
            .collect();
    assert_eq!(built, corpus);
}

#[test]
fn missing_directory_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    let err = load_plain_corpus(&missing).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    let msg = err.to_string();
    assert!(msg.contains("nope"));
    assert!(msg.contains("Check that the fixture directory exists"));
}

#[test]
fn paired_corpus_reads_sibling_expected_file() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "bar.compressed", &[9, 9, 9]);
    write_fixture(dir.path(), "bar.data", b"hello");
    write_fixture(dir.path(), "orphan.data", b"ignored");
    write_fixture(dir.path(), "notes.txt", b"ignored too");

    let corpus = load_paired_corpus(dir.path()).unwrap();
    assert_eq!(corpus.names().collect::<Vec<_>>(), vec!["bar"]);
    let bar = corpus.get("bar").unwrap();
    assert_eq!(bar.content, vec![9, 9, 9]);
    assert_eq!(bar.expected, b"hello".to_vec());
}

#[test]
fn paired_corpus_without_expected_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "bar.compressed", &[1]);
    write_fixture(dir.path(), "baz.compressed", &[2]);
    write_fixture(dir.path(), "baz.data", b"ok");

    let err = load_paired_corpus(dir.path()).unwrap_err();
    match err {
        LoadError::MissingExpected { name, path } => {
            assert_eq!(name, "bar");
            assert!(path.ends_with("bar.data"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn disabled_paired_fixture_needs_no_sibling() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "_off.compressed", &[1]);
    let corpus = load_paired_corpus(dir.path()).unwrap();
    assert!(corpus.is_empty());
}

#[test]
fn custom_layout_is_honored() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "a.z", &[1]);
    write_fixture(dir.path(), "a.plain", b"A");
    write_fixture(dir.path(), "#b.z", &[2]);
    write_fixture(dir.path(), "_c.z", &[3]);
    write_fixture(dir.path(), "_c.plain", b"C");

    let layout = FixtureLayout {
        exclusion_marker: '#',
        compressed_extension: "z".to_owned(),
        expected_extension: "plain".to_owned(),
    };
    let paired = load_paired_corpus_with(dir.path(), &layout).unwrap();
    assert_eq!(paired.names().collect::<Vec<_>>(), vec!["_c", "a"]);

    let plain = load_plain_corpus_with(dir.path(), &layout).unwrap();
    assert_eq!(plain.names().collect::<Vec<_>>(), vec!["_c", "a"]);
    assert_eq!(plain.get("_c").unwrap().content, vec![3]);
    assert_eq!(plain.get("a").unwrap().content, vec![1]);
}

#[test]
fn repository_fixtures_load() {
    let samples = load_plain_corpus(fixtures_dir().join("samples")).unwrap();
    assert_eq!(
        samples.names().collect::<Vec<_>>(),
        vec!["counting", "empty", "lorem_ipsum", "shapes"]
    );
    assert!(samples.get("empty").unwrap().content.is_empty());

    let raw = load_paired_corpus(fixtures_dir().join("samples_deflated_raw")).unwrap();
    assert_eq!(raw.names().collect::<Vec<_>>(), vec!["hello", "lorem_ipsum", "stored"]);
    assert_eq!(raw.get("hello").unwrap().expected, b"hello".to_vec());
}
