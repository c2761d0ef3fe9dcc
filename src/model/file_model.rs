use chrono::{DateTime, Utc};

/// One stored archive, blob included.
#[derive(Debug)]
pub struct FileRecord {
    pub id: String,
    pub username: String,
    pub filename: String,
    pub upload_time: DateTime<Utc>,
    pub filedata: Vec<u8>,
}

/// Listing row; carries the blob size instead of the blob.
#[derive(Debug)]
pub struct FileHeader {
    pub id: String,
    pub username: String,
    pub filename: String,
    pub upload_time: DateTime<Utc>,
    pub size: u64, // in bytes
}

/// A `files[]` part read from the upload form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub content: Vec<u8>,
}
