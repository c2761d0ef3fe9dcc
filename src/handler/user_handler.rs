// src/handler/user_handler.rs

use actix_session::Session;
use askama::Template;
use actix_web::{web, HttpResponse};
use bcrypt::{hash, verify};
use sqlx::sqlite::SqlitePool;

use crate::config::Config;
use crate::constants::{
    MESSAGE_LOGIN_FAILED, MESSAGE_LOGIN_SUCCESS, MESSAGE_LOGOUT_SUCCESS, MESSAGE_PASSWORD_MISMATCH,
    MESSAGE_SIGNUP_SUCCESS, MESSAGE_USERNAME_TAKEN, ROUTE_HOME, ROUTE_LOGIN, ROUTE_SIGNUP,
};
use crate::errors::AppError;
use crate::handler::{html, redirect};
use crate::model::{LoginForm, SignupForm, User};
use crate::repo::UserRepo;
use crate::session::{
    clear_session_username, push_flash, set_session_username, take_flashes, CurrentUser, Flash,
    FlashLevel,
};
use crate::views::{HomeTemplate, LoginTemplate, SignupTemplate};

pub struct UserHandler;

impl UserHandler {
    pub async fn home(user: CurrentUser, session: Session) -> Result<HttpResponse, AppError> {
        let flashes = take_flashes(&session);
        Ok(html(HomeTemplate::new(&user.username, &flashes).render()?))
    }

    pub async fn signup_form(session: Session) -> Result<HttpResponse, AppError> {
        let flashes = take_flashes(&session);
        Ok(html(SignupTemplate { flashes: &flashes }.render()?))
    }

    pub async fn signup(
        form: web::Form<SignupForm>,
        pool: web::Data<SqlitePool>,
        cfg: web::Data<Config>,
        session: Session,
    ) -> Result<HttpResponse, AppError> {
        let form = form.into_inner();

        if form.password != form.confirm_password {
            push_flash(&session, FlashLevel::Danger, MESSAGE_PASSWORD_MISMATCH)?;
            return Ok(redirect(ROUTE_SIGNUP));
        }

        let user_repo = UserRepo::new(pool.get_ref());
        if user_repo.get_user_by_username(&form.username).await?.is_some() {
            push_flash(&session, FlashLevel::Danger, MESSAGE_USERNAME_TAKEN)?;
            return Ok(redirect(ROUTE_SIGNUP));
        }

        let cost = cfg.bcrypt_cost;
        let password = form.password;
        let password_hash = web::block(move || hash(password, cost)).await??;

        let new_user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: form.username,
            password_hash,
        };

        // a concurrent signup may have taken the name since the lookup
        if !user_repo.create_user(&new_user).await? {
            push_flash(&session, FlashLevel::Danger, MESSAGE_USERNAME_TAKEN)?;
            return Ok(redirect(ROUTE_SIGNUP));
        }

        log::info!("## New user: {}", new_user.username);
        push_flash(&session, FlashLevel::Success, MESSAGE_SIGNUP_SUCCESS)?;
        Ok(redirect(ROUTE_LOGIN))
    }

    pub async fn login_form(session: Session) -> Result<HttpResponse, AppError> {
        let flashes = take_flashes(&session);
        Ok(html(LoginTemplate { flashes: &flashes }.render()?))
    }

    pub async fn login(
        creds: web::Form<LoginForm>,
        pool: web::Data<SqlitePool>,
        session: Session,
    ) -> Result<HttpResponse, AppError> {
        let creds = creds.into_inner();
        let user_repo = UserRepo::new(pool.get_ref());

        let verified = match user_repo.get_user_by_username(&creds.username).await? {
            Some(user) => {
                let password = creds.password;
                web::block(move || verify(password, &user.password_hash)).await??
            }
            None => false,
        };

        if !verified {
            log::info!("## Failed login for {}", creds.username);
            let mut flashes = take_flashes(&session);
            flashes.push(Flash {
                level: FlashLevel::Danger,
                message: MESSAGE_LOGIN_FAILED.to_string(),
            });
            return Ok(HttpResponse::Unauthorized()
                .content_type("text/html; charset=utf-8")
                .body(LoginTemplate { flashes: &flashes }.render()?));
        }

        set_session_username(&session, &creds.username)?;
        push_flash(&session, FlashLevel::Success, MESSAGE_LOGIN_SUCCESS)?;
        Ok(redirect(ROUTE_HOME))
    }

    pub async fn logout(session: Session) -> Result<HttpResponse, AppError> {
        clear_session_username(&session);
        push_flash(&session, FlashLevel::Info, MESSAGE_LOGOUT_SUCCESS)?;
        Ok(redirect(ROUTE_LOGIN))
    }
}
