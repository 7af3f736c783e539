use crate::error::StackTrace;
use crate::handler::AppModule;
use crate::route::{AccountRouter, OfferRouter, OrderRouter};
use error_stack::ResultExt;
use kernel::KernelError;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

mod controller;
mod error;
mod handler;
mod request;
mod response;
mod route;

#[tokio::main]
async fn main() -> Result<(), StackTrace> {
    let _ = dotenvy::dotenv();

    let appender = tracing_appender::rolling::daily(std::path::Path::new("./logs/"), "debug.log");
    let (non_blocking_appender, _guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_filter(tracing_subscriber::EnvFilter::new(
                    std::env::var("RUST_LOG").unwrap_or_else(|_| {
                        "application=debug,driver=debug,server=debug,tower_http=debug,sqlx=warn"
                            .into()
                    }),
                ))
                .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
        )
        .with(
            tracing_subscriber::fmt::Layer::default()
                .with_writer(non_blocking_appender)
                .with_ansi(false)
                .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
        )
        .init();

    let app = AppModule::new().await?;

    let purge = {
        let cache = app.cache().clone();
        let period = *cache.config().purge_interval();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                match cache.purge_expired() {
                    Ok(0) => {}
                    Ok(purged) => tracing::debug!("Purged {purged} expired cache entries"),
                    Err(e) => tracing::warn!("Cache purge failed: {e:?}"),
                }
            }
        })
    };

    let router = axum::Router::new()
        .route_order()
        .route_offer()
        .route_account()
        .layer(CorsLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(app.clone());

    let bind = driver::env_or("SERVER_ADDR", SocketAddr::from(([0, 0, 0, 0], 8080)))?;
    let tcp = TcpListener::bind(bind)
        .await
        .change_context_lazy(|| KernelError::Internal)
        .attach_printable_lazy(|| "Failed to listen tcp")?;
    tracing::info!("Listening on {bind}");

    axum::serve(tcp, router.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {e}");
            }
        })
        .await
        .change_context_lazy(|| KernelError::Internal)?;

    purge.abort();
    app.cache().shutdown()?;

    Ok(())
}
