use actix_session::{storage::CookieSessionStore, Session, SessionExt, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::constants::{MESSAGE_LOGIN_REQUIRED, SESSION_FLASHES, SESSION_USERNAME};
use crate::errors::AppError;

pub fn session_key(cfg: &Config) -> Key {
    match &cfg.session_key {
        Some(secret) => Key::from(secret.as_bytes()),
        None => {
            log::warn!("SESSION_KEY not set, sessions will not survive a restart");
            Key::generate()
        }
    }
}

pub fn session_middleware(key: Key, cookie_secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(cookie_secure)
        .build()
}

/// The logged-in identity of the current request.
///
/// Extracting it is the login gate: without a session username the request
/// is answered with a redirect to the login page.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub username: String,
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let session = req.get_session();
        match session_username(&session) {
            Some(username) => ready(Ok(CurrentUser { username })),
            None => {
                // best effort, the redirect happens either way
                let _ = push_flash(&session, FlashLevel::Danger, MESSAGE_LOGIN_REQUIRED);
                ready(Err(AppError::LoginRequired))
            }
        }
    }
}

pub fn session_username(session: &Session) -> Option<String> {
    session.get::<String>(SESSION_USERNAME).ok().flatten()
}

pub fn set_session_username(session: &Session, username: &str) -> Result<(), AppError> {
    session.renew();
    session
        .insert(SESSION_USERNAME, username)
        .map_err(|e| AppError::Session(e.to_string()))
}

pub fn clear_session_username(session: &Session) {
    session.remove(SESSION_USERNAME);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Danger,
    Info,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Danger => "danger",
            FlashLevel::Info => "info",
        }
    }
}

/// One-shot notice shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

pub fn push_flash(session: &Session, level: FlashLevel, message: &str) -> Result<(), AppError> {
    let mut flashes = session
        .get::<Vec<Flash>>(SESSION_FLASHES)
        .ok()
        .flatten()
        .unwrap_or_default();
    flashes.push(Flash {
        level,
        message: message.to_string(),
    });
    session
        .insert(SESSION_FLASHES, flashes)
        .map_err(|e| AppError::Session(e.to_string()))
}

pub fn take_flashes(session: &Session) -> Vec<Flash> {
    let flashes = session
        .get::<Vec<Flash>>(SESSION_FLASHES)
        .ok()
        .flatten()
        .unwrap_or_default();
    if !flashes.is_empty() {
        session.remove(SESSION_FLASHES);
    }
    flashes
}
