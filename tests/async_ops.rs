use std::fs;
use tempfile::tempdir;

use filekit::{CHUNK_SIZE, CancelFlag, FileHandle, FileKitError, FileOption};

#[tokio::test]
async fn async_append_matches_blocking_semantics() {
    let td = tempdir().unwrap();
    let h = FileHandle::new(td.path().join("log.txt")).unwrap();

    h.write_str_async("A", FileOption::Append).await.unwrap();
    h.write_str_async("B", FileOption::Append).await.unwrap();
    h.write_str_async("C", FileOption::Append).await.unwrap();

    assert_eq!(h.read_to_string_async().await.unwrap(), "ABC");
}

#[tokio::test]
async fn async_overwrite_truncates() {
    let td = tempdir().unwrap();
    let h = FileHandle::new(td.path().join("s.txt")).unwrap();

    h.write_str_async("a much longer first body", FileOption::Overwrite)
        .await
        .unwrap();
    h.write_str_async("short", FileOption::Overwrite).await.unwrap();

    assert_eq!(h.read_to_string_async().await.unwrap(), "short");
}

#[tokio::test]
async fn async_do_nothing_short_circuits() {
    let td = tempdir().unwrap();
    let p = td.path().join("keep.txt");
    fs::write(&p, "original").unwrap();

    let h = FileHandle::new(&p).unwrap();
    let used = h.write_str_async("clobber", FileOption::DoNothingIfExist).await.unwrap();

    assert_eq!(used, p);
    assert_eq!(fs::read_to_string(&p).unwrap(), "original");
}

#[tokio::test]
async fn async_increment_resolves_like_blocking() {
    let td = tempdir().unwrap();
    let base = td.path().join("T");
    let h = FileHandle::new(&base).unwrap();

    let first = h
        .write_str_async("A", FileOption::IncrementFileExtensionIfExist)
        .await
        .unwrap();
    let second = h
        .write_str_async("B", FileOption::IncrementFileExtensionIfExist)
        .await
        .unwrap();

    assert_eq!(first, td.path().join("T.1"));
    assert_eq!(second, td.path().join("T.2"));
    assert!(!base.exists());
}

#[tokio::test]
async fn async_copy_reports_cumulative_progress() {
    let td = tempdir().unwrap();
    let src = td.path().join("big.bin");
    let payload = vec![3u8; CHUNK_SIZE * 3 + 17];
    fs::write(&src, &payload).unwrap();

    let h = FileHandle::new(&src).unwrap();
    let mut seen = Vec::new();
    let mut progress = |n: u64| seen.push(n);
    h.copy_to_async(
        &td.path().join("big.out"),
        FileOption::Overwrite,
        None,
        Some(&mut progress),
    )
    .await
    .unwrap();

    assert_eq!(seen.last().copied(), Some(payload.len() as u64));
    assert!(seen.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(fs::read(td.path().join("big.out")).unwrap(), payload);
}

#[tokio::test]
async fn cancelled_transfer_is_interrupted() {
    let td = tempdir().unwrap();
    let src = td.path().join("src.bin");
    fs::write(&src, vec![1u8; CHUNK_SIZE * 4]).unwrap();

    let cancel = CancelFlag::new();
    cancel.cancel();

    let h = FileHandle::new(&src).unwrap();
    let err = h
        .copy_to_async(&td.path().join("dst.bin"), FileOption::Overwrite, Some(&cancel), None)
        .await
        .unwrap_err();

    assert!(matches!(err, FileKitError::Interrupted));
    // Cancellation leaves whatever was already written; no rollback.
    assert!(src.exists());
}

#[tokio::test]
async fn async_move_overwrite_relocates() {
    let td = tempdir().unwrap();
    let src = td.path().join("a.txt");
    let dest = td.path().join("b.txt");
    fs::write(&src, "content").unwrap();

    let mut h = FileHandle::new(&src).unwrap();
    let used = h.move_to_async(&dest, FileOption::Overwrite, None).await.unwrap();

    assert_eq!(used, dest);
    assert!(!src.exists());
    assert_eq!(fs::read_to_string(&dest).unwrap(), "content");
    assert_eq!(h.path(), dest);
}

#[tokio::test]
async fn async_copy_onto_itself_leaves_content_intact() {
    let td = tempdir().unwrap();
    let src = td.path().join("self.txt");
    fs::write(&src, "payload").unwrap();

    let h = FileHandle::new(&src).unwrap();
    let used = h
        .copy_to_async(&src, FileOption::Overwrite, None, None)
        .await
        .unwrap();

    assert_eq!(used, src);
    assert_eq!(fs::read_to_string(&src).unwrap(), "payload");
}

#[tokio::test]
async fn async_delete_is_idempotent() {
    let td = tempdir().unwrap();
    let p = td.path().join("gone.txt");
    fs::write(&p, "x").unwrap();

    let h = FileHandle::new(&p).unwrap();
    h.delete_async().await.unwrap();
    assert!(!p.exists());
    h.delete_async().await.unwrap();
}

#[tokio::test]
async fn async_change_extension_moves_the_file() {
    let td = tempdir().unwrap();
    let src = td.path().join("notes.txt");
    fs::write(&src, "n").unwrap();

    let mut h = FileHandle::new(&src).unwrap();
    let changed = h
        .change_extension_async("md", FileOption::Overwrite, None)
        .await
        .unwrap();

    assert!(changed);
    assert!(!src.exists());
    assert_eq!(h.path(), td.path().join("notes.md"));
    assert_eq!(fs::read_to_string(h.path()).unwrap(), "n");
}

#[tokio::test]
async fn async_change_extension_read_only_reports_no_op() {
    let td = tempdir().unwrap();
    let src = td.path().join("stay.txt");
    fs::write(&src, "s").unwrap();

    let mut h = FileHandle::new(&src).unwrap();
    let changed = h
        .change_extension_async("bak", FileOption::ReadOnly, None)
        .await
        .unwrap();

    assert!(!changed);
    assert!(src.exists());
}

#[tokio::test]
async fn async_read_missing_is_not_found() {
    let td = tempdir().unwrap();
    let h = FileHandle::new(td.path().join("void")).unwrap();
    assert!(matches!(
        h.read_bytes_async().await,
        Err(FileKitError::NotFound(_))
    ));
}
