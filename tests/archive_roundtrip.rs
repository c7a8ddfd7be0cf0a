#![cfg(feature = "archive")]

use std::fs;
use tempfile::tempdir;

use filekit::{Archive, Compression, FileKitError, FileOption, FolderHandle};

fn seed_tree(root: &std::path::Path) {
    fs::create_dir_all(root.join("docs")).unwrap();
    fs::write(root.join("readme.md"), "hello").unwrap();
    fs::write(root.join("docs/guide.md"), "guide body").unwrap();
}

#[test]
fn pack_then_unpack_restores_content() {
    let td = tempdir().unwrap();
    let src = td.path().join("project");
    seed_tree(&src);

    let h = FolderHandle::new(&src).unwrap();
    let zip = h
        .zip_to(
            &td.path().join("project.zip"),
            FileOption::Overwrite,
            Compression::Deflated,
        )
        .unwrap();
    assert!(zip.exists());

    let out = td.path().join("restored");
    let dest = FolderHandle::new(&out).unwrap();
    dest.unzip_from(&zip).unwrap();

    assert_eq!(fs::read_to_string(out.join("readme.md")).unwrap(), "hello");
    assert_eq!(
        fs::read_to_string(out.join("docs/guide.md")).unwrap(),
        "guide body"
    );
}

#[test]
fn open_lists_entries_with_slash_names() {
    let td = tempdir().unwrap();
    let src = td.path().join("project");
    seed_tree(&src);

    let zip = td.path().join("p.zip");
    Archive::from_directory(&src)
        .unwrap()
        .save_to_path(&zip, Compression::Stored)
        .unwrap();

    let opened = Archive::open(&zip).unwrap();
    let mut names: Vec<_> = opened.entries().iter().map(|e| e.name().to_string()).collect();
    names.sort();
    assert_eq!(names, ["docs/guide.md", "readme.md"]);

    let guide = opened
        .entries()
        .iter()
        .find(|e| e.name() == "docs/guide.md")
        .unwrap();
    assert_eq!(guide.bytes(), b"guide body");
}

#[test]
fn removed_entry_does_not_survive_a_save() {
    let td = tempdir().unwrap();
    let src = td.path().join("project");
    seed_tree(&src);

    let mut archive = Archive::from_directory(&src).unwrap();
    assert!(archive.remove_entry("readme.md"));

    let zip = td.path().join("pruned.zip");
    archive.save_to_path(&zip, Compression::Deflated).unwrap();

    let reopened = Archive::open(&zip).unwrap();
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.entries()[0].name(), "docs/guide.md");
}

#[test]
fn zip_do_nothing_keeps_existing_archive() {
    let td = tempdir().unwrap();
    let src = td.path().join("project");
    seed_tree(&src);
    let zip = td.path().join("existing.zip");
    fs::write(&zip, "not really a zip").unwrap();

    let h = FolderHandle::new(&src).unwrap();
    let used = h
        .zip_to(&zip, FileOption::DoNothingIfExist, Compression::Deflated)
        .unwrap();

    assert_eq!(used, zip);
    assert_eq!(fs::read_to_string(&zip).unwrap(), "not really a zip");
}

#[test]
fn zip_increment_resolves_a_fresh_name() {
    let td = tempdir().unwrap();
    let src = td.path().join("project");
    seed_tree(&src);
    let zip = td.path().join("backup.zip");
    fs::write(&zip, "taken").unwrap();

    let h = FolderHandle::new(&src).unwrap();
    let used = h
        .zip_to(&zip, FileOption::IncrementFileNameIfExist, Compression::Deflated)
        .unwrap();

    assert_eq!(used, td.path().join("backup1.zip"));
    assert!(Archive::open(&used).unwrap().len() > 0);
    assert_eq!(fs::read_to_string(&zip).unwrap(), "taken");
}

#[test]
fn append_and_read_only_are_invalid_packing_policies() {
    let td = tempdir().unwrap();
    let src = td.path().join("project");
    seed_tree(&src);

    let h = FolderHandle::new(&src).unwrap();
    for option in [FileOption::Append, FileOption::ReadOnly] {
        let err = h
            .zip_to(&td.path().join("a.zip"), option, Compression::Deflated)
            .unwrap_err();
        assert!(matches!(err, FileKitError::InvalidArgument(_)));
    }
}

#[test]
fn packing_a_missing_directory_is_not_found() {
    let td = tempdir().unwrap();
    let h = FolderHandle::new(td.path().join("void")).unwrap();
    let err = h
        .zip_to(&td.path().join("v.zip"), FileOption::Overwrite, Compression::Deflated)
        .unwrap_err();
    assert!(matches!(err, FileKitError::NotFound(_)));
}
