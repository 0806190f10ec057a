use std::net::SocketAddr;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bus_server::catalog::{BusCatalog, HttpCatalog, InMemoryCatalog};
use bus_server::config::{CatalogSource, ServerConfig};
use bus_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bus_server=info,tower_http=info")),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            std::process::exit(2);
        }
    };

    let source = match config.catalog_source() {
        Ok(source) => source,
        Err(e) => {
            error!("{e}");
            std::process::exit(2);
        }
    };

    match source {
        CatalogSource::Snapshot(path) => {
            let catalog = InMemoryCatalog::load(&path).expect("Failed to load bus data snapshot");
            info!(
                path = %path.display(),
                stops = catalog.stop_count(),
                services = catalog.service_count(),
                "Loaded bus data"
            );
            serve(catalog, config.bind_addr).await;
        }
        CatalogSource::Http(http) => {
            info!(base_url = %http.base_url, "Using remote bus API");
            let catalog = HttpCatalog::new(http).expect("Failed to create bus API client");
            serve(catalog, config.bind_addr).await;
        }
    }
}

async fn serve<C: BusCatalog + 'static>(catalog: C, addr: SocketAddr) {
    let app = create_router(AppState::new(catalog));

    info!("Bus route finder listening on http://{addr}");
    info!("  GET /health            - Health check");
    info!("  GET /routes            - Services from ?stop= to stops matching ?name= (JSON)");
    info!("  GET /routes/describe   - Same, as text");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
