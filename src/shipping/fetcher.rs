//! Quote fetching: validation, item lookup, carrier call, classification

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use validator::Validate;

use crate::config::ShippingConfig;
use crate::domain::aggregates::{Cart, CartError, QuoteResult, ShippableItem};
use crate::domain::value_objects::{DimensionsError, PostalCode};
use crate::shipping::carrier::{CarrierApi, CarrierReply, QuotePayload};
use crate::shipping::normalizer::normalize;
use crate::store::ItemStore;
use crate::{Result, ShippingError};

/// Body the storefront posts when the customer asks for a shipping price.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ShippingRequest {
    /// Destination postal code, any formatting.
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "product_id is required"))]
    pub product_id: String,
}

impl ShippingRequest {
    pub fn new(cep: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self { cep: cep.into(), product_id: product_id.into() }
    }

    /// Carts are quoted on their first item.
    pub fn for_cart(cart: &Cart, cep: impl Into<String>) -> std::result::Result<Self, CartError> {
        Ok(Self::new(cep, cart.quote_item_id()?))
    }
}

pub struct QuoteFetcher {
    config: ShippingConfig,
    store: Arc<dyn ItemStore>,
    carrier: Arc<dyn CarrierApi>,
}

impl QuoteFetcher {
    pub fn new(config: ShippingConfig, store: Arc<dyn ItemStore>, carrier: Arc<dyn CarrierApi>) -> Self {
        Self { config, store, carrier }
    }

    #[instrument(skip(self, request), fields(cep = %request.cep, product_id = %request.product_id))]
    pub async fn quote(&self, request: &ShippingRequest) -> Result<QuoteResult> {
        let destination = PostalCode::parse(&request.cep).map_err(|e| {
            warn!("rejecting postal code: {}", e);
            ShippingError::InvalidPostalCode(e.to_string())
        })?;
        request.validate().map_err(|e| {
            warn!("rejecting request: {}", e);
            ShippingError::InvalidRequest(e.to_string())
        })?;

        let item = self.load_item(&request.product_id).await?;

        let Some(credential) = self.config.carrier_token.as_deref() else {
            error!("carrier API token not configured");
            return Err(ShippingError::CarrierServiceUnavailable);
        };

        let payload = QuotePayload::single_item(&self.config.origin_postal_code, &destination, &item, self.config.insurance_value);
        info!(origin = %self.config.origin_postal_code, destination = %destination, "requesting carrier quote");

        let reply = self.carrier.calculate(credential, &payload).await.map_err(|e| {
            error!("carrier call failed: {}", e);
            ShippingError::CarrierApiError(e.to_string())
        })?;

        let quote = match reply {
            CarrierReply::Body(body) => normalize(&body).into_result(),
            CarrierReply::Rejected { status, body } => Err(classify_rejection(status, &body)),
        }?;
        info!(options = quote.all_options.len(), cheapest = quote.cheapest.price, "shipping quoted");
        Ok(quote)
    }

    async fn load_item(&self, id: &str) -> Result<ShippableItem> {
        let measurements = match self.store.item_measurements(id).await {
            Ok(Some(m)) => m,
            Ok(None) => {
                warn!("item not found");
                return Err(ShippingError::ItemNotFound(id.to_string()));
            }
            Err(e) => {
                error!("item lookup failed: {}", e);
                return Err(ShippingError::ItemNotFound(id.to_string()));
            }
        };
        ShippableItem::from_measurements(id, measurements.height, measurements.width, measurements.length, measurements.weight)
            .map_err(|DimensionsError::Missing(field)| {
                warn!(?measurements, "item cannot be auto-quoted: missing {}", field);
                ShippingError::MissingDimensions { item_id: id.to_string(), field }
            })
    }
}

/// A 4xx usually means the destination cannot be routed (often too close to
/// the origin) and is handled by arranging delivery by hand. Credential and
/// rate-limit statuses are our problem, not the address's.
pub fn classify_rejection(status: StatusCode, body: &str) -> ShippingError {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(details) => error!(%status, %details, "carrier rejected quote"),
        Err(_) => error!(%status, body, "carrier rejected quote with a non-JSON body"),
    }
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
            ShippingError::CarrierApiError(format!("carrier answered {}", status))
        }
        s if s.is_client_error() => ShippingError::UnserviceableAddress { status: s.as_u16() },
        s => ShippingError::CarrierApiError(format!("carrier answered {}", s)),
    }
}
