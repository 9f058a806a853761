//! Integration tests for the media store.
//!
//! Covers:
//! 1. Folder creation, nesting and listing
//! 2. Streamed uploads, best-effort failure handling, file details
//! 3. File and folder deletes
//! 4. Containment of raw deletes inside the media root

use easybase_media::{MediaConfig, MediaError, MediaStore, Upload, UploadOutcome};
use easybase_store::{PageRequest, Sort};
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tempfile::TempDir;
use tokio::io::{AsyncRead, ReadBuf};
use uuid::Uuid;

/// A store rooted at `<tmp>/upload`.
fn store() -> (TempDir, MediaStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = MediaStore::in_memory(MediaConfig::new(dir.path().join("upload"), "media"));
    (dir, store)
}

/// Reader that fails on first poll.
struct BrokenReader;

impl AsyncRead for BrokenReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "client went away")))
    }
}

#[tokio::test]
async fn folders_nest_and_list() {
    let (dir, store) = store();

    let a = store.create_folder("a", None).await.unwrap();
    let b = store.create_folder("b", Some(a)).await.unwrap();
    store.create_folder("c", Some(a)).await.unwrap();

    assert!(dir.path().join("upload/a/b").is_dir());
    assert!(dir.path().join("upload/a/c").is_dir());

    let request = PageRequest::new(0, 10).with_sort(Sort::desc("folder_name"));
    let page = store.folders_in(Some(a), &request).await.unwrap();
    let names: Vec<_> = page.content.iter().map(|f| f.folder_name.as_str()).collect();
    assert_eq!(names, vec!["c", "b"]);

    let top = store.folders_in(None, &PageRequest::default()).await.unwrap();
    assert_eq!(top.total_elements, 1);
    assert_eq!(top.content[0].folder_id, a);

    assert!(store
        .folders_in(Some(b), &PageRequest::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn create_folder_rejects_bad_input() {
    let (_dir, store) = store();

    assert!(matches!(
        store.create_folder("..", None).await,
        Err(MediaError::Validation(_))
    ));
    assert!(matches!(
        store.create_folder("a/b", None).await,
        Err(MediaError::Validation(_))
    ));
    assert!(matches!(
        store.create_folder("a", Some(Uuid::now_v7())).await,
        Err(MediaError::NotFound { .. })
    ));

    store.create_folder("a", None).await.unwrap();
    assert!(matches!(
        store.create_folder("a", None).await,
        Err(MediaError::Validation(_))
    ));
}

#[tokio::test]
async fn empty_upload_list_is_reported() {
    let (dir, store) = store();

    let outcome = store.add_files(None, Vec::new()).await.unwrap();
    assert_eq!(outcome, UploadOutcome::Empty);
    assert!(!dir.path().join("upload").exists());
}

#[tokio::test]
async fn uploads_stream_to_disk_with_urls() {
    let (dir, store) = store();
    let a = store.create_folder("a", None).await.unwrap();
    let b = store.create_folder("b", Some(a)).await.unwrap();

    let payload = vec![42u8; 20_000];
    let outcome = store
        .add_files(
            Some(b),
            vec![
                Upload::from_bytes("photo.png", "image/png", payload.clone()),
                Upload::from_bytes("notes.txt", "text/plain", "hello"),
            ],
        )
        .await
        .unwrap();

    let files = outcome.files();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].size_bytes, 20_000);
    assert_eq!(files[0].file_path, "/a/b/");
    assert_eq!(
        std::fs::read(dir.path().join("upload/a/b/photo.png")).unwrap(),
        payload
    );

    let details = store.file_details(files[0].id).await.unwrap();
    assert_eq!(details.url, "media/a/b/photo.png");
    assert_eq!(details.file_name, "photo.png");

    let listed = store.files_in(Some(b), &PageRequest::default()).await.unwrap();
    let urls: Vec<_> = listed.content.iter().map(|f| f.url.as_str()).collect();
    assert_eq!(urls, vec!["media/a/b/photo.png", "media/a/b/notes.txt"]);
}

#[tokio::test]
async fn failed_write_is_skipped_and_rest_continue() {
    let (dir, store) = store();

    let outcome = store
        .add_files(
            None,
            vec![
                Upload::from_bytes("first.txt", "text/plain", "one"),
                Upload::new("broken.bin", "application/octet-stream", BrokenReader),
                Upload::from_bytes("last.txt", "text/plain", "three"),
            ],
        )
        .await
        .unwrap();

    let names: Vec<_> = outcome.files().iter().map(|f| f.file_name.as_str()).collect();
    assert_eq!(names, vec!["first.txt", "last.txt"]);
    assert!(!dir.path().join("upload/broken.bin").exists());

    let listed = store.files_in(None, &PageRequest::default()).await.unwrap();
    assert_eq!(listed.total_elements, 2);
}

#[tokio::test]
async fn invalid_file_name_writes_nothing() {
    let (dir, store) = store();

    let err = store
        .add_files(
            None,
            vec![
                Upload::from_bytes("ok.txt", "text/plain", "fine"),
                Upload::from_bytes("../escape.txt", "text/plain", "nope"),
            ],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, MediaError::Validation(_)));
    assert!(!dir.path().join("upload/ok.txt").exists());
    assert!(!dir.path().join("escape.txt").exists());
}

#[tokio::test]
async fn reupload_overwrites_file_and_metadata() {
    let (dir, store) = store();

    let first = store
        .add_files(None, vec![Upload::from_bytes("doc.txt", "text/plain", "v1")])
        .await
        .unwrap();
    let second = store
        .add_files(None, vec![Upload::from_bytes("doc.txt", "text/markdown", "version 2")])
        .await
        .unwrap();

    assert_eq!(first.files()[0].id, second.files()[0].id);
    assert_eq!(second.files()[0].size_bytes, 9);
    assert_eq!(second.files()[0].content_type, "text/markdown");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("upload/doc.txt")).unwrap(),
        "version 2"
    );
}

#[tokio::test]
async fn delete_file_removes_disk_and_metadata() {
    let (dir, store) = store();
    let a = store.create_folder("a", None).await.unwrap();
    let outcome = store
        .add_files(Some(a), vec![Upload::from_bytes("photo.png", "image/png", "png")])
        .await
        .unwrap();
    let file_id = outcome.files()[0].id;

    store.delete_file(file_id).await.unwrap();

    assert!(!dir.path().join("upload/a/photo.png").exists());
    assert!(dir.path().join("upload/a").is_dir());
    assert!(matches!(
        store.file_details(file_id).await,
        Err(MediaError::NotFound { .. })
    ));
    assert!(matches!(
        store.delete_file(file_id).await,
        Err(MediaError::NotFound { .. })
    ));
}

#[tokio::test]
async fn delete_folder_removes_tree() {
    let (dir, store) = store();
    let a = store.create_folder("a", None).await.unwrap();
    let b = store.create_folder("b", Some(a)).await.unwrap();
    let keep = store.create_folder("keep", None).await.unwrap();

    store
        .add_files(Some(b), vec![Upload::from_bytes("deep.txt", "text/plain", "x")])
        .await
        .unwrap();
    store
        .add_files(Some(keep), vec![Upload::from_bytes("safe.txt", "text/plain", "y")])
        .await
        .unwrap();

    store.delete_folder(a).await.unwrap();

    assert!(!dir.path().join("upload/a").exists());
    assert!(dir.path().join("upload/keep/safe.txt").exists());
    assert!(store
        .files_in(Some(b), &PageRequest::default())
        .await
        .unwrap()
        .is_empty());

    let top = store.folders_in(None, &PageRequest::default()).await.unwrap();
    assert_eq!(top.total_elements, 1);
    assert_eq!(top.content[0].folder_name, "keep");

    // Name is free again
    store.create_folder("a", None).await.unwrap();
}

#[tokio::test]
async fn traversal_delete_is_rejected_without_leaking_path() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("srv").join("upload");
    std::fs::create_dir_all(&root).unwrap();
    let victim = dir.path().join("etc").join("passwd");
    std::fs::create_dir_all(victim.parent().unwrap()).unwrap();
    std::fs::write(&victim, "root:x:0:0").unwrap();

    let store = MediaStore::in_memory(MediaConfig::new(&root, "media"));
    let err = store.delete_from_root("../../etc/passwd").await.unwrap_err();

    assert!(matches!(err, MediaError::OutsideRoot));
    assert!(victim.exists());
    let message = err.to_string();
    assert!(!message.contains("passwd"));
    assert!(!message.contains(&*dir.path().to_string_lossy()));
}

#[tokio::test]
async fn delete_from_root_handles_missing_and_root() {
    let (dir, store) = store();
    std::fs::create_dir_all(dir.path().join("upload/a")).unwrap();
    std::fs::write(dir.path().join("upload/a/f.txt"), "x").unwrap();

    assert!(!store.delete_from_root("/a/missing.txt").await.unwrap());
    assert!(matches!(
        store.delete_from_root("/").await,
        Err(MediaError::OutsideRoot)
    ));
    assert!(store.delete_from_root("/a/f.txt").await.unwrap());
    assert!(!dir.path().join("upload/a/f.txt").exists());
}

#[cfg(unix)]
#[tokio::test]
async fn symlink_escape_is_rejected() {
    let (dir, store) = store();
    let outside = dir.path().join("outside");
    std::fs::create_dir_all(&outside).unwrap();
    std::fs::write(outside.join("secret.txt"), "s").unwrap();
    std::fs::create_dir_all(dir.path().join("upload")).unwrap();
    std::os::unix::fs::symlink(&outside, dir.path().join("upload/link")).unwrap();

    let err = store.delete_from_root("/link/secret.txt").await.unwrap_err();

    assert!(matches!(err, MediaError::OutsideRoot));
    assert!(outside.join("secret.txt").exists());
}

#[cfg(unix)]
#[tokio::test]
async fn symlink_alias_inside_root_removes_only_the_link() {
    let (dir, store) = store();
    let real = dir.path().join("upload/real");
    std::fs::create_dir_all(&real).unwrap();
    std::fs::write(real.join("keep.txt"), "k").unwrap();
    let alias = dir.path().join("upload/alias");
    std::os::unix::fs::symlink(&real, &alias).unwrap();

    assert!(store.delete_from_root("/alias").await.unwrap());

    assert!(real.join("keep.txt").exists());
    assert!(std::fs::symlink_metadata(&alias).is_err());
}

#[cfg(unix)]
#[tokio::test]
async fn dangling_symlink_is_removed() {
    let (dir, store) = store();
    std::fs::create_dir_all(dir.path().join("upload")).unwrap();
    let link = dir.path().join("upload/stale");
    std::os::unix::fs::symlink(dir.path().join("gone"), &link).unwrap();

    assert!(store.delete_from_root("/stale").await.unwrap());
    assert!(std::fs::symlink_metadata(&link).is_err());
}
