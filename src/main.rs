//! Storefront shipping - quote service

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_shipping::api::{self, AppState};
use storefront_shipping::config::AppConfig;
use storefront_shipping::messaging::ContactLinks;
use storefront_shipping::shipping::{HttpCarrierClient, QuoteFetcher};
use storefront_shipping::store::PgItemStore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = AppConfig::from_env()?;
    if config.shipping.carrier_token.is_none() {
        tracing::warn!("CARRIER_API_TOKEN not set, shipping quotes will answer CarrierServiceUnavailable");
    }

    let db = PgPoolOptions::new().max_connections(10).connect(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    let nats = match &config.nats_url {
        Some(url) => match async_nats::connect(url.as_str()).await {
            Ok(client) => Some(client),
            Err(e) => { tracing::warn!("NATS unavailable, quote events disabled: {}", e); None }
        },
        None => None,
    };

    let carrier = HttpCarrierClient::new(&config.shipping)?;
    let fetcher = QuoteFetcher::new(config.shipping.clone(), Arc::new(PgItemStore::new(db)), Arc::new(carrier));
    let contacts = config.whatsapp_number.as_deref().and_then(ContactLinks::new);
    let app = api::router(AppState::new(fetcher).with_contacts(contacts).with_nats(nats));

    tracing::info!("🚚 storefront-shipping listening on 0.0.0.0:{}", config.port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?, app).await?;
    Ok(())
}
