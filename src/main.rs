mod archive;
mod config;
mod constants;
mod db;
mod errors;
mod handler;
mod model;
mod repo;
mod session;
mod views;

#[cfg(test)]
mod tests;

use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;

use config::Config;
use session::{session_key, session_middleware};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let cfg = Config::from_env()?;
    std::fs::create_dir_all(&cfg.upload_dir)?;

    let pool = db::connect(&cfg.database_url).await?;
    let key = session_key(&cfg);

    log::info!("Starting server at {}", cfg.bind_addr);
    let bind_addr = cfg.bind_addr.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(cfg.clone()))
            .wrap(session_middleware(key.clone(), cfg.cookie_secure))
            .wrap(actix_web::middleware::Logger::default())
            .configure(handler::configure)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
