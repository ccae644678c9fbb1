use std::fs;

use pretty_assertions::assert_eq;
use scheduler_engine::{
    ensure_output_dir, keys, load_value, save_value, AtomicFileWriter, DirectorySink, FileSink,
    FileStore, KeyValueStore, StoreError,
};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("exports");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("exams.ics", "BEGIN:VCALENDAR").unwrap();
    assert_eq!(first.file_name().unwrap(), "exams.ics");
    let second = writer.write("exams.ics", b"END:VCALENDAR").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "END:VCALENDAR");
}

#[test]
fn writer_rejects_paths_as_file_names() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().join("out"));
    assert!(writer.write("../escape.ics", "x").is_err());
    assert!(writer.write("", "x").is_err());
    assert!(!temp.path().join("escape.ics").exists());
}

#[test]
fn no_partial_file_when_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let mut sink = DirectorySink::new(file_path.clone());
    assert!(sink.deliver(b"data", "classes.ics").is_err());
    assert!(sink.delivered().is_empty());
    assert!(!file_path.with_file_name("classes.ics").exists());
}

#[test]
fn directory_sink_records_deliveries() {
    let temp = TempDir::new().unwrap();
    let mut sink = DirectorySink::new(temp.path().join("out"));
    sink.deliver(b"one", "exams.ics").unwrap();
    sink.deliver(b"two", "classes.ics").unwrap();
    let names: Vec<_> = sink
        .delivered()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["exams.ics", "classes.ics"]);
}

#[test]
fn file_store_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("state").join("scheduler.ron");

    let mut store = FileStore::open(&path).unwrap();
    assert_eq!(store.get(keys::SELECTED_TERM).unwrap(), None);
    save_value(&mut store, keys::SELECTED_TERM, "Spring25").unwrap();
    save_value(&mut store, keys::PENDING_SYNC, &true).unwrap();
    store.remove(keys::PENDING_SYNC).unwrap();
    // Removing an absent key is not an error.
    store.remove(keys::PENDING_SYNC).unwrap();

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(
        load_value::<String>(&reopened, keys::SELECTED_TERM).as_deref(),
        Some("Spring25")
    );
    assert_eq!(load_value::<bool>(&reopened, keys::PENDING_SYNC), None);
    assert_eq!(reopened.path(), path.as_path());
}

#[test]
fn corrupt_store_file_is_reported() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("scheduler.ron");
    fs::write(&path, "this is not ron {").unwrap();

    let err = FileStore::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }), "{err}");
}
