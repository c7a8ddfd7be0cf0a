use std::fs;
use tempfile::tempdir;

use filekit::{FileHandle, FileOption};

#[test]
fn append_round_trip_concatenates() {
    let td = tempdir().unwrap();
    let h = FileHandle::new(td.path().join("log.txt")).unwrap();

    h.write_str("A", FileOption::Append).unwrap();
    h.write_str("B", FileOption::Append).unwrap();
    h.write_str("C", FileOption::Append).unwrap();

    assert_eq!(fs::read_to_string(h.path()).unwrap(), "ABC");
}

#[test]
fn overwrite_round_trip_keeps_last() {
    let td = tempdir().unwrap();
    let h = FileHandle::new(td.path().join("state.txt")).unwrap();

    h.write_str("A", FileOption::Overwrite).unwrap();
    h.write_str("B", FileOption::Overwrite).unwrap();
    h.write_str("C", FileOption::Overwrite).unwrap();

    assert_eq!(fs::read_to_string(h.path()).unwrap(), "C");
}

#[test]
fn do_nothing_is_idempotent_and_returns_original_path() {
    let td = tempdir().unwrap();
    let p = td.path().join("frozen.txt");
    fs::write(&p, "original").unwrap();

    let h = FileHandle::new(&p).unwrap();
    for _ in 0..3 {
        let used = h.write_str("clobber attempt", FileOption::DoNothingIfExist).unwrap();
        assert_eq!(used, p);
    }
    assert_eq!(fs::read_to_string(&p).unwrap(), "original");
}

#[test]
fn do_nothing_creates_when_missing() {
    let td = tempdir().unwrap();
    let h = FileHandle::new(td.path().join("new.txt")).unwrap();

    let used = h.write_str("first", FileOption::DoNothingIfExist).unwrap();
    assert_eq!(used, h.path());
    assert_eq!(fs::read_to_string(h.path()).unwrap(), "first");
}

#[test]
fn increment_name_writes_are_pairwise_distinct() {
    let td = tempdir().unwrap();
    let base = td.path().join("report.txt");
    let h = FileHandle::new(&base).unwrap();

    let mut used = Vec::new();
    for content in ["A", "B", "C"] {
        used.push(h.write_str(content, FileOption::IncrementFileNameIfExist).unwrap());
    }

    for (i, a) in used.iter().enumerate() {
        assert_ne!(*a, base, "no resolved path may equal the base");
        for b in &used[i + 1..] {
            assert_ne!(a, b, "resolved paths must be pairwise distinct");
        }
    }
    assert_eq!(fs::read_to_string(&used[0]).unwrap(), "A");
    assert_eq!(fs::read_to_string(&used[1]).unwrap(), "B");
    assert_eq!(fs::read_to_string(&used[2]).unwrap(), "C");
    assert!(!base.exists());
}

#[test]
fn increment_extension_writes_are_pairwise_distinct() {
    let td = tempdir().unwrap();
    let base = td.path().join("data.txt");
    let h = FileHandle::new(&base).unwrap();

    let a = h.write_str("A", FileOption::IncrementFileExtensionIfExist).unwrap();
    let b = h.write_str("B", FileOption::IncrementFileExtensionIfExist).unwrap();

    assert_ne!(a, b);
    assert_ne!(a, base);
    assert_ne!(b, base);
    assert_eq!(fs::read_to_string(&a).unwrap(), "A");
    assert_eq!(fs::read_to_string(&b).unwrap(), "B");
}

// The concrete extensionless scenario: `T` has no extension, so the resolver
// treats it as having no numeric suffix and produces `.1`, then `.2`.
#[test]
fn extensionless_base_gains_bare_numeric_extension() {
    let td = tempdir().unwrap();
    let base = td.path().join("T");
    let h = FileHandle::new(&base).unwrap();

    let first = h.write_str("A", FileOption::IncrementFileExtensionIfExist).unwrap();
    let second = h.write_str("B", FileOption::IncrementFileExtensionIfExist).unwrap();

    assert_eq!(first, td.path().join("T.1"));
    assert_eq!(second, td.path().join("T.2"));
    assert_eq!(fs::read_to_string(&first).unwrap(), "A");
    assert_eq!(fs::read_to_string(&second).unwrap(), "B");
    assert!(!base.exists());
}

#[test]
fn overwrite_replaces_seeded_fixture() {
    use assert_fs::prelude::*;

    let tmp = assert_fs::TempDir::new().unwrap();
    let file = tmp.child("seeded.txt");
    file.write_str("before").unwrap();

    let h = FileHandle::new(file.path()).unwrap();
    h.write_str("after", FileOption::Overwrite).unwrap();
    file.assert("after");
}

#[test]
fn write_creates_missing_parent_directories() {
    let td = tempdir().unwrap();
    let h = FileHandle::new(td.path().join("deep/ly/nested/out.txt")).unwrap();
    let used = h.write_str("x", FileOption::Overwrite).unwrap();
    assert_eq!(fs::read_to_string(&used).unwrap(), "x");
}

#[test]
fn delete_missing_file_does_not_raise() {
    let td = tempdir().unwrap();
    let h = FileHandle::new(td.path().join("never-existed.txt")).unwrap();
    h.delete().unwrap();
    h.delete().unwrap();
    assert!(fs::read_dir(td.path()).unwrap().next().is_none());
}
