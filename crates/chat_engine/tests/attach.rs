use std::fs;

use chat_engine::{attach_local_file, AttachError};

#[test]
fn attaching_a_file_yields_file_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.png");
    fs::write(&path, b"not really a png").unwrap();

    let attachment = attach_local_file(&path).expect("attach");

    assert_eq!(attachment.file_name, "photo.png");
    assert_eq!(attachment.file_url.scheme(), "file");
    assert!(attachment.file_url.path().ends_with("/photo.png"));
    assert_eq!(attachment.byte_len, 16);
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = attach_local_file(&dir.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err, AttachError::NotFound { .. }));
}

#[test]
fn directory_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = attach_local_file(dir.path()).unwrap_err();
    assert!(matches!(err, AttachError::NotAFile { .. }));
}
