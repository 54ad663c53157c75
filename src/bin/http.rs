#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;
    use std::path::Path;

    use study_planner::config::{CONFIG_FILE_NAME, PlannerConfig};
    use study_planner::{Backend, http_api, logging};

    let mut config = PlannerConfig::load(Path::new(CONFIG_FILE_NAME))?;
    config.apply_env();
    logging::init_tracing(&config.log.filter);

    let addr: SocketAddr = config.http.addr.parse()?;
    let store = Backend::open(&config.storage)?;

    tracing::info!(%addr, backend = ?config.storage.backend, "study-planner HTTP API listening");
    http_api::serve(addr, http_api::AppState::new(store)).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
