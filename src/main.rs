use std::{process, sync::Arc};

use postdeck::{
    application::{error::AppError, posts::PostsManager, repos::PostStore},
    config,
    infra::{
        error::InfraError,
        http::{self, AppState},
        store, telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

mod posts_tool;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    let store = store::build_store(&settings.store)?;

    match command {
        config::Command::Serve(_) => run_serve(&settings, store).await,
        config::Command::Posts(args) => posts_tool::run(store, args.action).await,
    }
}

async fn run_serve(settings: &config::Settings, store: Arc<dyn PostStore>) -> Result<(), AppError> {
    let manager = PostsManager::mount(store).await;
    let router = http::build_router(AppState::new(manager.clone()));

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(
        target = "postdeck::server",
        addr = %settings.server.addr,
        table = %settings.store.table,
        "listening"
    );

    let result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")));

    manager.shutdown();
    result
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(target = "postdeck::server", error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!(target = "postdeck::server", "shutting down");
}
