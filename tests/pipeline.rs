use std::fs;
use std::path::Path;
use std::sync::Arc;

use audiobook_meta::utils::sidecar;
use audiobook_meta::{
    BookProcessor, Console, DirectoryWalker, ProcessOutcome, ScriptedRoles, WalkSummary,
};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

// Minimal mono 16-bit PCM WAV of the given length, silence only. Enough
// for the real probe to report an exact duration.
fn write_wav(path: &Path, seconds: f64) {
    let sample_rate = 8_000u32;
    let frames = (seconds * sample_rate as f64).round() as u32;
    let data_len = frames * 2;

    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes()); // block align
    bytes.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.resize(44 + data_len as usize, 0);

    fs::write(path, bytes).unwrap();
}

fn processor(resume: bool) -> BookProcessor {
    BookProcessor::new(
        Arc::new(Console::new()),
        Arc::new(ScriptedRoles::default()),
        resume,
    )
}

fn walker(resume: bool) -> DirectoryWalker {
    let console = Arc::new(Console::new());
    let books = BookProcessor::new(
        Arc::clone(&console),
        Arc::new(ScriptedRoles::default()),
        resume,
    );
    DirectoryWalker::new(books, console, Vec::new())
}

#[test]
fn sidecar_is_named_after_the_book_folder() {
    let dir = tempdir().unwrap();
    let book = dir.path().join("The Hobbit");
    fs::create_dir_all(&book).unwrap();
    write_wav(&book.join("01.wav"), 1.0);
    write_wav(&book.join("02.wav"), 2.0);

    let outcome = processor(false).process(&book).unwrap();
    assert_eq!(outcome, ProcessOutcome::Written);

    let record = sidecar::read(&book.join("The Hobbit.xml")).unwrap();
    assert_eq!(record.running_time.value, "0:00:03");
}

#[test]
fn summed_half_seconds_round_up() {
    let dir = tempdir().unwrap();
    let book = dir.path().join("Short Story");
    fs::create_dir_all(&book).unwrap();
    write_wav(&book.join("a.wav"), 0.3);
    write_wav(&book.join("b.wav"), 0.3);

    processor(false).process(&book).unwrap();

    let record = sidecar::read(&book.join("Short Story.xml")).unwrap();
    assert_eq!(record.running_time.value, "0:00:01");
}

#[test]
fn resume_leaves_existing_sidecars_untouched() {
    let dir = tempdir().unwrap();
    let book = dir.path().join("Done Book");
    fs::create_dir_all(&book).unwrap();
    write_wav(&book.join("01.wav"), 2.0);

    let first = processor(false).process(&book).unwrap();
    assert_eq!(first, ProcessOutcome::Written);

    let sidecar_path = book.join("Done Book.xml");
    let before = fs::read(&sidecar_path).unwrap();

    let second = processor(true).process(&book).unwrap();
    assert_eq!(second, ProcessOutcome::SkippedExisting);
    assert_eq!(fs::read(&sidecar_path).unwrap(), before);
}

#[test]
fn walker_discovers_books_at_every_level() {
    let dir = tempdir().unwrap();

    let solo = dir.path().join("Solo Book");
    fs::create_dir_all(&solo).unwrap();
    write_wav(&solo.join("01.wav"), 1.0);

    let nested = dir.path().join("Series").join("Book Two");
    fs::create_dir_all(&nested).unwrap();
    write_wav(&nested.join("01.wav"), 1.0);

    let shelved = dir.path().join("English").join("Author A").join("Book One");
    fs::create_dir_all(&shelved).unwrap();
    write_wav(&shelved.join("01.wav"), 1.0);

    let walker = walker(false);
    walker.walk(dir.path()).unwrap();

    assert_eq!(
        walker.summary(),
        WalkSummary {
            written: 3,
            ..WalkSummary::default()
        }
    );
    assert!(solo.join("Solo Book.xml").exists());
    assert!(nested.join("Book Two.xml").exists());
    assert!(shelved.join("Book One.xml").exists());
    // Branch folders are not books.
    assert!(!dir.path().join("Series").join("Series.xml").exists());
}

#[test]
fn language_root_children_are_never_books() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("English");
    let book = root.join("Lonely Book");
    fs::create_dir_all(&book).unwrap();
    write_wav(&book.join("01.wav"), 1.0);

    let walker = walker(false);
    walker.walk(&root).unwrap();

    // The leaf under the language root is recursed into, not processed.
    assert_eq!(walker.summary(), WalkSummary::default());
    assert!(!book.join("Lonely Book.xml").exists());
}

#[test]
fn a_failing_book_does_not_stop_its_siblings() {
    let dir = tempdir().unwrap();

    let good = dir.path().join("Good Book");
    fs::create_dir_all(&good).unwrap();
    write_wav(&good.join("01.wav"), 1.0);

    let bad = dir.path().join("Bad Book");
    fs::create_dir_all(&bad).unwrap();
    fs::write(bad.join("01.mp3"), b"this is not mpeg audio").unwrap();

    let walker = walker(false);
    walker.walk(dir.path()).unwrap();

    let summary = walker.summary();
    assert_eq!(summary.written, 1);
    assert_eq!(summary.failed, 1);
    assert!(good.join("Good Book.xml").exists());
    assert!(!bad.join("Bad Book.xml").exists());
}

#[test]
fn rerunning_with_resume_is_idempotent() {
    let dir = tempdir().unwrap();
    for name in ["Book A", "Book B"] {
        let book = dir.path().join(name);
        fs::create_dir_all(&book).unwrap();
        write_wav(&book.join("01.wav"), 1.5);
    }

    let first = walker(true);
    first.walk(dir.path()).unwrap();
    assert_eq!(first.summary().written, 2);

    let contents: Vec<Vec<u8>> = ["Book A", "Book B"]
        .iter()
        .map(|name| fs::read(dir.path().join(name).join(format!("{}.xml", name))).unwrap())
        .collect();

    let second = walker(true);
    second.walk(dir.path()).unwrap();
    assert_eq!(
        second.summary(),
        WalkSummary {
            skipped: 2,
            ..WalkSummary::default()
        }
    );

    for (name, before) in ["Book A", "Book B"].iter().zip(contents) {
        let after = fs::read(dir.path().join(name).join(format!("{}.xml", name))).unwrap();
        assert_eq!(after, before);
    }
}
