use sqlx::{Row, sqlite::SqlitePool};
use chrono::{DateTime, Utc};
use crate::model::{FileHeader, FileRecord};
use anyhow::Result;
use uuid::Uuid;

pub struct FileRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FileRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Stores an archive blob and returns the generated id.
    pub async fn create_file(
        &self,
        username: &str,
        filename: &str,
        upload_time: DateTime<Utc>,
        filedata: &[u8],
    ) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO files (id, username, filename, upload_time, filedata) VALUES (?, ?, ?, ?, ?)")
            .bind(&id)
            .bind(username)
            .bind(filename)
            .bind(upload_time)
            .bind(filedata)
            .execute(self.pool)
            .await?;
        Ok(id)
    }

    pub async fn get_files_by_username(&self, username: &str) -> Result<Vec<FileHeader>> {
        let rows = sqlx::query(
            "SELECT id, username, filename, upload_time, length(filedata) AS size
             FROM files WHERE username = ? ORDER BY upload_time DESC",
        )
        .bind(username)
        .fetch_all(self.pool)
        .await?;

        let files = rows
            .into_iter()
            .map(|row| FileHeader {
                id: row.get("id"),
                username: row.get("username"),
                filename: row.get("filename"),
                upload_time: row.get("upload_time"),
                size: row.get::<i64, _>("size") as u64,
            })
            .collect();

        Ok(files)
    }

    pub async fn get_file_by_id(&self, file_id: &str) -> Result<Option<FileRecord>> {
        let row = sqlx::query("SELECT id, username, filename, upload_time, filedata FROM files WHERE id = ?")
            .bind(file_id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(|row| FileRecord {
            id: row.get("id"),
            username: row.get("username"),
            filename: row.get("filename"),
            upload_time: row.get("upload_time"),
            filedata: row.get("filedata"),
        }))
    }

    /// Deletes the record only if `username` owns it. `false` covers both
    /// "no such id" and "someone else's file".
    pub async fn delete_file_owned_by(&self, file_id: &str, username: &str) -> Result<bool> {
        let res = sqlx::query("DELETE FROM files WHERE id = ? AND username = ?")
            .bind(file_id)
            .bind(username)
            .execute(self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
