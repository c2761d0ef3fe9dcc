use actix_web::{HttpResponse, http::{header, StatusCode}, ResponseError};
use thiserror::Error;

use crate::archive::ArchiveError;
use crate::constants::{MESSAGE_INTERNAL_SERVER_ERROR, ROUTE_LOGIN};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("login required")]
    LoginRequired,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Database(#[from] anyhow::Error),
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),
    #[error("session error: {0}")]
    Session(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::LoginRequired => StatusCode::SEE_OTHER,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_)
            | AppError::Archive(_)
            | AppError::Session(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::LoginRequired => HttpResponse::SeeOther()
                .insert_header((header::LOCATION, ROUTE_LOGIN))
                .finish(),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().body(msg.clone()),
            e => {
                log::error!("{}", e);
                HttpResponse::InternalServerError().body(MESSAGE_INTERNAL_SERVER_ERROR)
            }
        }
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(e: actix_web::error::BlockingError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Internal(format!("rendering page: {}", e))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(e: bcrypt::BcryptError) -> Self {
        AppError::Internal(format!("password hashing: {}", e))
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(e: actix_multipart::MultipartError) -> Self {
        AppError::BadRequest(format!("invalid multipart: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_required_redirects() {
        let resp = AppError::LoginRequired.error_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), ROUTE_LOGIN);
    }

    #[test]
    fn internal_faults_are_500() {
        let err = AppError::Archive(ArchiveError::NoFiles);
        assert_eq!(err.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        let err = AppError::Database(anyhow::anyhow!("store unreachable"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
