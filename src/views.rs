//! Server-rendered pages, see `templates/`.

use askama::Template;

use crate::constants::UPLOAD_FIELD;
use crate::model::FileHeader;
use crate::session::Flash;

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate<'a> {
    pub username: &'a str,
    pub upload_field: &'static str,
    pub flashes: &'a [Flash],
}

impl<'a> HomeTemplate<'a> {
    pub fn new(username: &'a str, flashes: &'a [Flash]) -> Self {
        Self {
            username,
            upload_field: UPLOAD_FIELD,
            flashes,
        }
    }
}

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupTemplate<'a> {
    pub flashes: &'a [Flash],
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate<'a> {
    pub flashes: &'a [Flash],
}

#[derive(Template)]
#[template(path = "myfiles.html")]
pub struct MyFilesTemplate<'a> {
    pub username: &'a str,
    pub files: &'a [FileHeader],
    pub flashes: &'a [Flash],
}

mod filters {
    use chrono::{DateTime, Utc};

    pub(crate) fn datetime(ts: &DateTime<Utc>) -> ::askama::Result<String> {
        Ok(ts.format("%Y-%m-%d %H:%M:%S UTC").to_string())
    }
}
