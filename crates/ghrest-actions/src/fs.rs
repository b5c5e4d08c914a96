//! Filesystem helpers.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::Result;

/// Recursively copy `src` into `dst`, merging with what is already there.
///
/// Existing files in `dst` are overwritten. Returns the number of files copied.
///
/// # Errors
/// Returns error if a directory can't be walked or a file can't be copied.
pub fn copy_dir_all(src: &Path, dst: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(src) {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    tracing::debug!(src = %src.display(), dst = %dst.display(), copied, "copied directory");
    Ok(copied)
}
