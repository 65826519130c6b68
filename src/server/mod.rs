pub mod download;
pub mod error;
pub mod generate;

use crate::{config::Config, logger, service::ImageService, upstream::UpstreamClient};
use actix_web::{middleware, web, App, HttpServer};

pub use error::DownloadFailure;

/// Shared, read-only state handed to every request.
pub struct AppState {
    pub service: ImageService,
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/generate")
            .route(web::post().to(generate::generate))
            .route(web::get().to(generate::describe)),
    )
    .service(
        web::resource("/api/download")
            .route(web::post().to(download::download))
            .route(web::get().to(download::describe)),
    );
}

pub async fn run(config: Config) -> std::io::Result<()> {
    logger::log_startup_info(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        &config.server.base_url(),
    );
    logger::log_config_info(&config);

    let upstream = UpstreamClient::new(config.upstream.clone());
    let state = web::Data::new(AppState {
        service: ImageService::from_upstream(&upstream),
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(routes)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
