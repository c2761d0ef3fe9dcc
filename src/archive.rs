//! Zips a batch of uploaded files through an on-disk staging directory.
//!
//! Layout under the upload root:
//!
//! ```text
//! <upload_root>/<user folder>/temp_<timestamp>/   staged uploads
//! <upload_root>/<user folder>/<archive name>
//! ```
//!
//! The user folder is the percent-encoded username, so distinct users never
//! share it. Both entries are removed once the archive bytes are in memory.
//! Two uploads by the same user within the same second share the staging
//! directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::constants::{FALLBACK_FILENAME, TIMESTAMP_FORMAT};
use crate::model::UploadedFile;

// '%' itself stays escaped, which keeps the mapping injective
const USER_FOLDER: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_');

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("no files selected")]
    NoFiles,
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("walking staging dir: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("zip: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// A finished archive, ready to be stored.
#[derive(Debug)]
pub struct Archive {
    pub filename: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    upload_root: PathBuf,
}

impl ArchiveBuilder {
    pub fn new(upload_root: impl Into<PathBuf>) -> Self {
        Self {
            upload_root: upload_root.into(),
        }
    }

    pub fn user_dir(&self, username: &str) -> PathBuf {
        self.upload_root.join(user_folder(username))
    }

    /// Stages `files`, zips them and returns the archive bytes.
    ///
    /// `now` is the local wall-clock time used for the archive and staging
    /// names. Fails with [`ArchiveError::NoFiles`] before touching the
    /// filesystem if `files` is empty.
    pub fn build(
        &self,
        username: &str,
        files: &[UploadedFile],
        now: NaiveDateTime,
    ) -> Result<Archive, ArchiveError> {
        if files.is_empty() {
            return Err(ArchiveError::NoFiles);
        }

        let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
        let filename = archive_name(username, now);

        let user_dir = self.user_dir(username);
        let staging = user_dir.join(format!("temp_{}", timestamp));
        let zip_path = user_dir.join(secure_filename(&filename));
        fs::create_dir_all(&staging)?;

        for file in files {
            let path = staging.join(secure_filename(&file.name));
            fs::write(&path, &file.content)?;
        }

        zip_dir(&staging, &zip_path)?;
        let data = fs::read(&zip_path)?;

        fs::remove_dir_all(&staging)?;
        fs::remove_file(&zip_path)?;

        log::info!(
            "## Archived {} file(s) for {} into {} ({} bytes)",
            files.len(),
            username,
            filename,
            data.len()
        );

        Ok(Archive { filename, data })
    }
}

pub fn archive_name(username: &str, now: NaiveDateTime) -> String {
    format!("{}_{}.zip", username, now.format(TIMESTAMP_FORMAT))
}

/// Folder name for a user's staging area, e.g. `team/ops` -> `team%2Fops`.
pub fn user_folder(username: &str) -> String {
    utf8_percent_encode(username, USER_FOLDER).to_string()
}

/// Reduces an uploaded name to a single safe path segment.
///
/// Directory components are dropped, characters not allowed in filenames are
/// removed, whitespace runs become `_` and leading dots are stripped. Names
/// with nothing left fall back to `upload.bin`.
pub fn secure_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned = sanitize_filename::sanitize(base)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        cleaned.to_string()
    }
}

fn zip_dir(src: &Path, dst: &Path) -> Result<(), ArchiveError> {
    let mut zip = ZipWriter::new(fs::File::create(dst)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let name = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        zip.start_file(name, options)?;
        let mut f = fs::File::open(entry.path())?;
        io::copy(&mut f, &mut zip)?;
    }

    zip.finish()?;
    Ok(())
}
