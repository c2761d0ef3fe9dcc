//! Route tests driving the whole app through `actix_web::test`.

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::test::{self, TestRequest};
use actix_http::Request;
use sqlx::sqlite::SqlitePool;
use tempfile::TempDir;

use crate::config::Config;

macro_rules! test_app {
    ($pool:expr, $cfg:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($pool.clone()))
                .app_data(actix_web::web::Data::new($cfg.clone()))
                .wrap(crate::session::session_middleware(
                    actix_web::cookie::Key::generate(),
                    false,
                ))
                .configure(crate::handler::configure),
        )
        .await
    };
}


const BOUNDARY: &str = "zipvault-test-boundary";

pub struct TestEnv {
    pub pool: SqlitePool,
    pub cfg: Config,
    pub upload_dir: TempDir,
}

pub async fn setup_test_env() -> TestEnv {
    let upload_dir = TempDir::new().unwrap();
    let cfg = Config {
        upload_dir: upload_dir.path().to_path_buf(),
        bcrypt_cost: 4,
        ..Config::default()
    };
    TestEnv {
        pool: crate::db::memory_pool().await,
        cfg,
        upload_dir,
    }
}

/// Carries the session cookie from one request to the next.
#[derive(Default)]
pub struct Browser {
    cookie: Option<Cookie<'static>>,
}

impl Browser {
    pub async fn send<S, B>(&mut self, app: &S, req: TestRequest) -> ServiceResponse<B>
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let req = match &self.cookie {
            Some(c) => req.cookie(c.clone()),
            None => req,
        };
        let resp = test::call_service(app, req.to_request()).await;
        if let Some(c) = resp.response().cookies().last() {
            self.cookie = Some(c.into_owned());
        }
        resp
    }

    pub async fn get<S, B>(&mut self, app: &S, uri: &str) -> ServiceResponse<B>
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        self.send(app, TestRequest::get().uri(uri)).await
    }

    pub async fn post_form<S, B>(
        &mut self,
        app: &S,
        uri: &str,
        form: &[(&str, &str)],
    ) -> ServiceResponse<B>
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        self.send(app, TestRequest::post().uri(uri).set_form(form)).await
    }

    pub async fn upload<S, B>(&mut self, app: &S, files: &[(&str, &str)]) -> ServiceResponse<B>
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let req = TestRequest::post()
            .uri("/upload")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(multipart_body(files));
        self.send(app, req).await
    }

    /// GETs `uri` and returns the page body as text.
    pub async fn page<S, B>(&mut self, app: &S, uri: &str) -> String
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let resp = self.get(app, uri).await;
        body_text(resp).await
    }

    pub async fn signup_and_login<S, B>(&mut self, app: &S, username: &str, password: &str)
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let resp = self
            .post_form(
                app,
                "/signup",
                &[
                    ("username", username),
                    ("password", password),
                    ("confirm_password", password),
                ],
            )
            .await;
        assert_redirect(&resp, "/login");

        let resp = self
            .post_form(app, "/login", &[("username", username), ("password", password)])
            .await;
        assert_redirect(&resp, "/");
    }
}

pub fn multipart_body(files: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, content) in files {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"files[]\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, name
            )
            .as_bytes(),
        );
        body.extend_from_slice(content.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn assert_redirect<B>(resp: &ServiceResponse<B>, location: &str) {
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
        location
    );
}

pub async fn body_text<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).unwrap()
}
