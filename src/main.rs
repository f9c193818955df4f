use std::sync::Arc;
use std::time::Duration;

use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use chrono::{Datelike, Utc};
use dotenvy::dotenv;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use hrm_leave::config::Config;
use hrm_leave::docs::ApiDoc;
use hrm_leave::leave::LeaveService;
use hrm_leave::routes;
use hrm_leave::services::{LogDispatcher, RetryingDispatcher};
use hrm_leave::state::AppState;
use hrm_leave::store::{Directory, DirectorySeed, MemoryStore};

const REMINDER_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[get("/")]
async fn index() -> impl Responder {
    "Leave service is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
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

    let store = Arc::new(MemoryStore::new());
    if let Some(path) = &config.seed_file {
        store.load(DirectorySeed::from_file(path)?);
    }

    let notifier = Arc::new(RetryingDispatcher::new(Arc::new(LogDispatcher)));
    let service = LeaveService::in_memory(store.clone(), config.workflow.clone())
        .with_notifier(notifier.clone());

    let year = Utc::now().with_timezone(&config.workflow.utc_offset).year();
    for tenant in store.tenants() {
        service
            .ledger()
            .rollover(year, &store.employees(tenant), &store.leave_types(tenant));
    }

    let state = AppState::new(service);
    let limiter = routes::build_limiter(config.rate_protected_per_min)?;

    let reminder_state = state.clone();
    actix_web::rt::spawn(async move {
        let mut tick = actix_web::rt::time::interval(REMINDER_INTERVAL);
        loop {
            tick.tick().await;
            reminder_state.leave.send_reminders();
            let delivered = notifier.retry_pending();
            if delivered > 0 {
                info!(delivered, "queued notifications delivered");
            }
        }
    });

    let server_addr = config.server_addr.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(config.clone()))
            .app_data(Data::new(state.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, &config, limiter.clone()))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
