// src/handler/file_handler.rs

use actix_multipart::Multipart;
use actix_session::Session;
use askama::Template;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use chrono::{Local, Utc};
use futures_util::TryStreamExt as _;
use sqlx::sqlite::SqlitePool;

use crate::archive::ArchiveBuilder;
use crate::config::Config;
use crate::constants::{
    MESSAGE_DELETE_DENIED, MESSAGE_DELETE_SUCCESS, MESSAGE_FILE_NOT_FOUND, MESSAGE_NO_FILES,
    MESSAGE_UPLOAD_SUCCESS, MESSAGE_UPLOAD_TOO_LARGE, MIME_ZIP, ROUTE_HOME, ROUTE_MY_FILES,
    UPLOAD_FIELD,
};
use crate::errors::AppError;
use crate::handler::{html, redirect};
use crate::model::UploadedFile;
use crate::repo::FileRepo;
use crate::session::{push_flash, take_flashes, CurrentUser, FlashLevel};
use crate::views::MyFilesTemplate;

enum Uploads {
    Files(Vec<UploadedFile>),
    TooLarge,
}

/// Collects the non-empty `files[]` parts into memory.
async fn read_uploads(payload: &mut Multipart, limit: usize) -> Result<Uploads, AppError> {
    let mut files = Vec::new();
    let mut total: usize = 0;

    while let Some(mut field) = payload.try_next().await? {
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_owned);
        let wanted = field.name() == Some(UPLOAD_FIELD);

        let mut content = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            if !wanted {
                continue;
            }
            total += chunk.len();
            if total > limit {
                return Ok(Uploads::TooLarge);
            }
            content.extend_from_slice(&chunk);
        }

        match filename {
            Some(name) if wanted && !name.is_empty() => {
                log::info!("## GOT a file: {} ({} bytes)", name, content.len());
                files.push(UploadedFile { name, content });
            }
            _ => {}
        }
    }

    Ok(Uploads::Files(files))
}

pub struct FileHandler;

impl FileHandler {

    pub async fn upload(
        user: CurrentUser,
        session: Session,
        pool: web::Data<SqlitePool>,
        cfg: web::Data<Config>,
        mut payload: Multipart,
    ) -> Result<HttpResponse, AppError> {
        let files = match read_uploads(&mut payload, cfg.max_upload_size).await? {
            Uploads::Files(files) => files,
            Uploads::TooLarge => {
                push_flash(&session, FlashLevel::Danger, MESSAGE_UPLOAD_TOO_LARGE)?;
                return Ok(redirect(ROUTE_HOME));
            }
        };

        if files.is_empty() {
            push_flash(&session, FlashLevel::Danger, MESSAGE_NO_FILES)?;
            return Ok(redirect(ROUTE_HOME));
        }

        let now = Local::now();
        let builder = ArchiveBuilder::new(cfg.upload_dir.clone());
        let username = user.username.clone();
        let archive =
            web::block(move || builder.build(&username, &files, now.naive_local())).await??;

        let file_repo = FileRepo::new(pool.get_ref());
        let id = file_repo
            .create_file(
                &user.username,
                &archive.filename,
                now.with_timezone(&Utc),
                &archive.data,
            )
            .await?;
        log::info!("## Stored {} as {}", archive.filename, id);

        push_flash(&session, FlashLevel::Success, MESSAGE_UPLOAD_SUCCESS)?;
        Ok(redirect(ROUTE_MY_FILES))
    }

    pub async fn my_files(
        user: CurrentUser,
        session: Session,
        pool: web::Data<SqlitePool>,
    ) -> Result<HttpResponse, AppError> {
        let file_repo = FileRepo::new(pool.get_ref());
        let files = file_repo.get_files_by_username(&user.username).await?;
        let flashes = take_flashes(&session);
        let page = MyFilesTemplate {
            username: &user.username,
            files: &files,
            flashes: &flashes,
        };
        Ok(html(page.render()?))
    }

    pub async fn download(
        user: CurrentUser,
        session: Session,
        pool: web::Data<SqlitePool>,
        file_id: web::Path<String>,
    ) -> Result<HttpResponse, AppError> {
        let file_repo = FileRepo::new(pool.get_ref());

        let record = match file_repo.get_file_by_id(&file_id).await? {
            Some(record) if record.username == user.username => record,
            _ => {
                push_flash(&session, FlashLevel::Danger, MESSAGE_FILE_NOT_FOUND)?;
                return Ok(redirect(ROUTE_MY_FILES));
            }
        };

        log::info!(
            "## Sending file: {} ({}, uploaded {}) to {}",
            record.filename,
            record.id,
            record.upload_time,
            user.username
        );
        Ok(HttpResponse::Ok()
            .content_type(MIME_ZIP)
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(record.filename)],
            })
            .body(record.filedata))
    }

    pub async fn delete(
        user: CurrentUser,
        session: Session,
        pool: web::Data<SqlitePool>,
        file_id: web::Path<String>,
    ) -> Result<HttpResponse, AppError> {
        log::info!("## Deleting file: {}", file_id);
        let file_repo = FileRepo::new(pool.get_ref());

        if file_repo.delete_file_owned_by(&file_id, &user.username).await? {
            push_flash(&session, FlashLevel::Success, MESSAGE_DELETE_SUCCESS)?;
        } else {
            push_flash(&session, FlashLevel::Danger, MESSAGE_DELETE_DENIED)?;
        }
        Ok(redirect(ROUTE_MY_FILES))
    }

}
