//! Staging-directory lifecycle.
//!
//! Owns the on-disk staging tree: idempotent creation, destructive reset,
//! and single-file copies. Directories a stage writes into are fully
//! recreated beforehand so stale artifacts from a prior run never leak
//! forward. Nothing here touches archive files or invokes tools.

use crate::pipeline::error::{Error, ErrorExt, Result};
use std::io;
use std::path::Path;
use tokio::fs;

/// Creates the directory (and parents) if absent. Idempotent.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    Ok(fs::create_dir_all(path).await?)
}

/// Deletes the directory recursively if present, then recreates it empty.
///
/// Used immediately before any stage that must not see stale data.
pub async fn reset_dir(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    Ok(fs::create_dir_all(path).await?)
}

/// Copies a regular file, creating any parent directories of the
/// destination as necessary. The copy carries the source's modification
/// time so staged files keep the timestamp of the file they came from.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::GenericError(format!("{from:?} does not exist")));
    }
    if !from.is_file() {
        return Err(Error::GenericError(format!("{from:?} is not a file")));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir).await?;
    }
    fs::copy(from, to).await.fs_context("copying file", to)?;

    let modified = fs::metadata(from)
        .await
        .fs_context("reading metadata", from)?
        .modified()
        .fs_context("reading modification time", from)?;
    std::fs::OpenOptions::new()
        .write(true)
        .open(to)
        .fs_context("opening copied file", to)?
        .set_modified(modified)
        .fs_context("setting modification time", to)?;
    Ok(())
}
