use crate::error::SnapshotError;
use crate::models::{AppDetails, ReviewEntry, Snapshot, Timestamp};
use chrono::Local;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Wraps fetched data into a snapshot stamped with the current wall-clock time.
pub fn build(app_details: AppDetails, reviews: Vec<ReviewEntry>) -> Snapshot {
    build_at(
        app_details,
        reviews,
        Timestamp::Zoned(Local::now().fixed_offset()),
    )
}

pub fn build_at(
    app_details: AppDetails,
    reviews: Vec<ReviewEntry>,
    generated_at: Timestamp,
) -> Snapshot {
    Snapshot {
        app_details,
        reviews,
        generated_at,
    }
}

/// Replaces the file at `path` with `text`, creating missing parent directories.
/// A failure midway may leave a truncated file behind.
pub fn write<P: AsRef<Path>>(path: P, text: &str) -> Result<(), SnapshotError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| SnapshotError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let write_error = |source| SnapshotError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(text.as_bytes()).map_err(write_error)?;
    writer.flush().map_err(write_error)?;
    Ok(())
}
