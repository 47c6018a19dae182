//! Integration tests for the RawFile value type.

use bytes::Bytes;
use rawfile::{DigestAlgorithm, FileError, FileExtension, MemoryStore, RawFile};
use std::io::Write;
use tempfile::NamedTempFile;

#[tokio::test]
async fn test_from_path_text() {
    let mut tmp = NamedTempFile::with_suffix(".txt").unwrap();
    let content = "file content here";
    write!(tmp, "{}", content).unwrap();
    tmp.flush().unwrap();

    let file = RawFile::from_path(tmp.path(), None).await.unwrap();
    assert_eq!(file.extension(), FileExtension::Txt);
    assert_eq!(file.size(), content.len());
    assert_eq!(file.read_text(), content);
}

#[tokio::test]
async fn test_from_path_missing_is_not_found() {
    let err = RawFile::from_path("example.pdf", None).await.unwrap_err();
    assert!(matches!(err, FileError::NotFound(_)));
}

#[tokio::test]
async fn test_from_path_directory_is_invalid_argument() {
    let dir = tempfile::tempdir().unwrap();
    let err = RawFile::from_path(dir.path(), None).await.unwrap_err();
    assert!(matches!(err, FileError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_from_path_unknown_suffix() {
    let tmp = NamedTempFile::with_suffix(".xyz").unwrap();
    let err = RawFile::from_path(tmp.path(), None).await.unwrap_err();
    assert!(matches!(err, FileError::TypeResolution(_)));
}

#[tokio::test]
async fn test_explicit_override_beats_suffix() {
    let mut tmp = NamedTempFile::with_suffix(".txt").unwrap();
    write!(tmp, "not actually a pdf").unwrap();
    tmp.flush().unwrap();

    let file = RawFile::from_path(tmp.path(), Some(FileExtension::Pdf))
        .await
        .unwrap();
    assert_eq!(file.extension(), FileExtension::Pdf);
    assert_eq!(file.mime_type(), "application/pdf");
}

#[tokio::test]
async fn test_save_to_roundtrip() {
    let content = "save me to disk";
    let file = RawFile::from_bytes(Bytes::from(content), FileExtension::Txt);

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("saved.txt");
    file.save_to(&dest).await.unwrap();

    let reloaded = RawFile::from_path(&dest, None).await.unwrap();
    assert_eq!(reloaded, file);
    assert_eq!(reloaded.sha256(), file.sha256());
}

#[tokio::test]
async fn test_save_to_leaves_no_temp_file() {
    let file = RawFile::from_bytes(Bytes::from("x"), FileExtension::Txt);

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("out.txt");
    file.save_to(&dest).await.unwrap();

    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(entries, vec!["out.txt".to_string()]);
}

#[tokio::test]
async fn test_save_to_missing_directory_fails_cleanly() {
    let file = RawFile::from_bytes(Bytes::from("x"), FileExtension::Txt);

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("no-such-dir").join("out.txt");
    let err = file.save_to(&dest).await.unwrap_err();
    assert!(matches!(err, FileError::Io(_)));
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_compress_roundtrip() {
    let payload: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
    let file = RawFile::from_bytes(Bytes::from(payload.clone()), FileExtension::Png);

    let compressed = file.compress().unwrap();
    assert_eq!(compressed.extension(), FileExtension::Png);

    let restored = compressed.decompress().unwrap();
    assert_eq!(restored.contents().as_ref(), payload.as_slice());
    assert_eq!(restored.extension(), FileExtension::Png);
    assert_eq!(restored, file);
}

#[tokio::test]
async fn test_compress_empty_roundtrip() {
    let file = RawFile::from_bytes(Bytes::new(), FileExtension::Txt);
    let restored = file.compress().unwrap().decompress().unwrap();
    assert!(restored.is_empty());
    assert_eq!(restored.extension(), FileExtension::Txt);
}

#[tokio::test]
async fn test_digest_stable_across_calls() {
    let file = RawFile::from_bytes(Bytes::from("digest me"), FileExtension::Txt);
    assert_eq!(
        file.digest(DigestAlgorithm::Sha256),
        file.digest(DigestAlgorithm::Sha256)
    );
    assert_ne!(
        file.digest(DigestAlgorithm::Md5),
        file.digest(DigestAlgorithm::Sha256)
    );
}

#[tokio::test]
async fn test_from_object_store_suffix_resolution() {
    let mut store = MemoryStore::new();
    store.insert("bucket", "reports/q3.pdf", &b"%PDF-1.4"[..], None);

    let file = RawFile::from_object_store(&store, "bucket", "reports/q3.pdf", None)
        .await
        .unwrap();
    assert_eq!(file.extension(), FileExtension::Pdf);
    assert_eq!(file.contents().as_ref(), b"%PDF-1.4");
}

#[tokio::test]
async fn test_from_object_store_content_type_resolution() {
    let mut store = MemoryStore::new();
    store.insert("bucket", "payload", &b"{}"[..], Some("application/json"));

    let file = RawFile::from_object_store(&store, "bucket", "payload", None)
        .await
        .unwrap();
    assert_eq!(file.extension(), FileExtension::Json);
}

#[tokio::test]
async fn test_from_object_store_override_wins() {
    let mut store = MemoryStore::new();
    store.insert("bucket", "data.txt", &b"bytes"[..], Some("application/json"));

    let file = RawFile::from_object_store(&store, "bucket", "data.txt", Some(FileExtension::Pdf))
        .await
        .unwrap();
    assert_eq!(file.extension(), FileExtension::Pdf);
}

#[tokio::test]
async fn test_from_object_store_unresolved_is_an_error() {
    // Unmapped provider content type, no recognized suffix, no override:
    // object storage raises instead of falling back (unlike from_url).
    let mut store = MemoryStore::new();
    store.insert("bucket", "blob.dat", &b"<xml/>"[..], Some("application/xml"));

    let err = RawFile::from_object_store(&store, "bucket", "blob.dat", None)
        .await
        .unwrap_err();
    assert!(matches!(err, FileError::TypeResolution(_)));
}

#[tokio::test]
async fn test_from_object_store_provider_failure() {
    let store = MemoryStore::new();
    let err = RawFile::from_object_store(&store, "bucket", "missing.txt", None)
        .await
        .unwrap_err();
    assert!(matches!(err, FileError::SourceUnavailable(_)));
}

#[tokio::test]
async fn test_from_database_blob() {
    let file = RawFile::from_database_blob(Bytes::from("blob data"), FileExtension::Txt);
    assert_eq!(file.read_text(), "blob data");
    assert_eq!(file.extension(), FileExtension::Txt);
}
