//! Persisting uploaded parts into the upload folder

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use super::UploadError;
use crate::logger;

/// UTC suffix appended to stored names, second granularity
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H:%M:%S";

/// An upload written to disk
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub path: PathBuf,
    /// Client file name with any directory part removed
    pub file_name: String,
    pub bytes: u64,
}

/// Last `/`-separated segment of a client-supplied file name.
/// Drops directories the client sent along, so stored files never leave the upload folder.
pub fn basename(file_name: &str) -> &str {
    file_name.rsplit('/').next().unwrap_or(file_name)
}

pub fn stored_file_name(basename: &str, now: DateTime<Utc>) -> String {
    format!("{basename}-{}", now.format(TIMESTAMP_FORMAT))
}

/// Stream a multipart field into `<folder>/<basename>-<timestamp>`.
///
/// A same-name upload within the same second overwrites the earlier file.
/// On failure the partially written file is removed.
pub async fn persist_field(
    field: &mut multer::Field<'_>,
    folder: &Path,
    file_name: &str,
) -> Result<StoredFile, UploadError> {
    let path = folder.join(stored_file_name(file_name, Utc::now()));

    match write_chunks(field, &path).await {
        Ok(bytes) => Ok(StoredFile {
            path,
            file_name: file_name.to_string(),
            bytes,
        }),
        Err(e) => {
            remove_partial(&path).await;
            Err(e)
        }
    }
}

/// Remove a partially written upload, logging when it is left behind
async fn remove_partial(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => logger::log_warning(&format!(
            "Failed to remove partial upload {}: {e}",
            path.display()
        )),
    }
}

async fn write_chunks(field: &mut multer::Field<'_>, path: &Path) -> Result<u64, UploadError> {
    let mut file = File::create(path).await?;
    let mut written: u64 = 0;
    while let Some(chunk) = field.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}
