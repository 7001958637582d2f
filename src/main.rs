//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use stockfast::config::{AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Inicializa o logger (RUST_LOG, padrão "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = Config::from_env()?;
    let addr = config.bind_addr.clone();
    let app_state = AppState::new(config)?;

    tracing::info!(
        "📦 Catálogo: {:?} | Barracões: {}",
        app_state.catalog_service.source(),
        app_state.config.warehouses.join(", ")
    );

    let app = stockfast::app(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
