use std::sync::Arc;

use external_services::cart_reader::HttpCartReader;
use server::{configs, error::ConfigurationError, http, logger};

#[tokio::main]
async fn main() -> Result<(), ConfigurationError> {
    #[allow(clippy::expect_used)]
    let config = configs::Config::new().expect("Failed while parsing config");
    logger::setup(&config.log);

    let cart_reader = HttpCartReader::new(config.order_module.base_url.clone())
        .map_err(|report| ConfigurationError::ServerError(report.to_string()))?;

    let config = Arc::new(config);
    let state = http::state::AppState::new(Arc::clone(&config), Arc::new(cart_reader));
    let router = http::router::create_router(state);

    let listener = config.server.tcp_listener().await?;
    tracing::info!("gateway adapter listening");
    axum::serve(listener, router)
        .await
        .map_err(|error| ConfigurationError::ServerError(error.to_string()))?;

    Ok(())
}
