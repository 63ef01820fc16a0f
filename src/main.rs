use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;
use std::sync::Arc;

mod api;
mod config;
mod directory;
mod docs;
mod engine;
mod error;
mod model;
mod routes;

use config::Config;
use directory::StaticDirectory;
use engine::coordinator::AttendanceCoordinator;
use engine::notifier::{self, ChangeNotifier};
use engine::policy::StatusPolicy;
use engine::store::SessionStore;

use crate::docs::ApiDoc;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Attendance engine up"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let directory = Arc::new(
        StaticDirectory::from_file(&config.seed_file)
            .map_err(|e| std::io::Error::other(format!("{e:#}")))?,
    );

    let store = Arc::new(SessionStore::new());
    let notifier_hub = ChangeNotifier::new(config.notifier_capacity);
    let policy = StatusPolicy::new(
        config.late_tolerance_minutes,
        config.overtime_tolerance_minutes,
    );

    let coordinator = Data::new(AttendanceCoordinator::new(
        directory.clone(),
        directory,
        store,
        notifier_hub.clone(),
        policy,
    ));

    // In-process stand-in for the external notification transport; a
    // dropped delivery here never touches committed session state.
    actix_web::rt::spawn(notifier::run_dispatcher(notifier_hub));

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(coordinator.clone())
            .app_data(Data::new(config.clone()))
            .service(index)
            // Rate-limited attendance routes
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await
}
