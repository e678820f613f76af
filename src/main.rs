use actix_web::web;
use dotenvy::dotenv;
use store_service::{build_server, AppState, Settings};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let settings = Settings::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let state = web::Data::new(AppState::new(settings.admin_username.clone()));

    log::info!(
        "Starting store service at http://{}:{}",
        settings.host,
        settings.port
    );

    build_server(state, &settings.host, settings.port)?.await
}
