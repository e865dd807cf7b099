use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum AttachError {
    #[error("{} does not exist", path.display())]
    NotFound { path: PathBuf },
    #[error("{} is not a regular file", path.display())]
    NotAFile { path: PathBuf },
    #[error("{} cannot be expressed as a file URL", path.display())]
    NotRepresentable { path: PathBuf },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// A local file exposed to the conversation by reference. Nothing is uploaded
/// and the reference is only meaningful for the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalAttachment {
    pub file_name: String,
    pub file_url: Url,
    pub byte_len: u64,
}

pub fn attach_local_file(path: &Path) -> Result<LocalAttachment, AttachError> {
    let canonical = fs::canonicalize(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => AttachError::NotFound {
            path: path.to_path_buf(),
        },
        _ => AttachError::Io(err),
    })?;

    let meta = fs::metadata(&canonical)?;
    if !meta.is_file() {
        return Err(AttachError::NotAFile { path: canonical });
    }
    // Fails early on files we are not allowed to read.
    File::open(&canonical)?;

    let file_name = match canonical.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => return Err(AttachError::NotAFile { path: canonical }),
    };
    let file_url = Url::from_file_path(&canonical).map_err(|()| AttachError::NotRepresentable {
        path: canonical.clone(),
    })?;

    Ok(LocalAttachment {
        file_name,
        file_url,
        byte_len: meta.len(),
    })
}
