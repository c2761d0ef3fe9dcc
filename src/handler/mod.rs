mod file_handler;
mod user_handler;

pub use file_handler::FileHandler;
pub use user_handler::UserHandler;

use actix_web::{http::header, web, HttpResponse};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(UserHandler::home))
        .route("/signup", web::get().to(UserHandler::signup_form))
        .route("/signup", web::post().to(UserHandler::signup))
        .route("/login", web::get().to(UserHandler::login_form))
        .route("/login", web::post().to(UserHandler::login))
        .route("/logout", web::get().to(UserHandler::logout))
        .route("/upload", web::post().to(FileHandler::upload))
        .route("/myfiles", web::get().to(FileHandler::my_files))
        .route("/download/{file_id}", web::get().to(FileHandler::download))
        .route("/delete/{file_id}", web::post().to(FileHandler::delete));
}

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub(crate) fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}
