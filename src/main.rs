use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use dasom_backend::core::logging;
use dasom_backend::server::router::router;
use dasom_backend::server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let state = AppState::initialize().context("Failed to initialize application state")?;
    logging::init(&state.paths);

    let bind_addr = format!("{}:{}", state.settings.server.host, state.settings.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;

    tracing::info!("Listening on {}", addr);

    let app: Router = router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
