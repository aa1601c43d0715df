//! HTTP side of the carrier aggregator

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::ShippingConfig;
use crate::domain::aggregates::ShippableItem;
use crate::domain::value_objects::PostalCode;

/// Body of the aggregator's calculate call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotePayload {
    pub from: PostalEndpoint,
    pub to: PostalEndpoint,
    pub products: Vec<PackageLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostalEndpoint { pub postal_code: String }

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageLine {
    pub id: String,
    pub width: f64,
    pub height: f64,
    pub length: f64,
    pub weight: f64,
    pub insurance_value: f64,
    pub quantity: u32,
}

impl QuotePayload {
    /// One package, quantity 1.
    pub fn single_item(origin: &PostalCode, destination: &PostalCode, item: &ShippableItem, insurance_value: f64) -> Self {
        let dims = item.dimensions();
        Self {
            from: PostalEndpoint { postal_code: origin.digits().to_string() },
            to: PostalEndpoint { postal_code: destination.digits().to_string() },
            products: vec![PackageLine {
                id: item.id().to_string(),
                width: dims.width(),
                height: dims.height(),
                length: dims.length(),
                weight: dims.weight(),
                insurance_value,
                quantity: 1,
            }],
        }
    }
}

/// What came back from a call that reached the aggregator.
#[derive(Debug, Clone, PartialEq)]
pub enum CarrierReply {
    /// 2xx with a JSON body, shape not yet checked.
    Body(Value),
    Rejected { status: StatusCode, body: String },
}

#[derive(Error, Debug)]
pub enum CarrierCallError {
    #[error("request to carrier failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("carrier response is not JSON: {0}")]
    Decode(String),
}

#[async_trait]
pub trait CarrierApi: Send + Sync {
    /// Single attempt, no retries.
    async fn calculate(&self, credential: &str, payload: &QuotePayload) -> Result<CarrierReply, CarrierCallError>;
}

pub struct HttpCarrierClient {
    client: Client,
    url: String,
    user_agent: String,
}

impl HttpCarrierClient {
    pub fn new(config: &ShippingConfig) -> Result<Self, CarrierCallError> {
        let client = Client::builder().timeout(config.carrier_timeout).build()?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: &ShippingConfig, client: Client) -> Self {
        Self { client, url: config.carrier_api_url.clone(), user_agent: config.user_agent.clone() }
    }
}

#[async_trait]
impl CarrierApi for HttpCarrierClient {
    async fn calculate(&self, credential: &str, payload: &QuotePayload) -> Result<CarrierReply, CarrierCallError> {
        let response = self.client
            .post(&self.url)
            .bearer_auth(credential)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, &self.user_agent)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        debug!(%status, bytes = text.len(), "carrier responded");

        if !status.is_success() {
            return Ok(CarrierReply::Rejected { status, body: text });
        }
        let body = serde_json::from_str(&text).map_err(|e| CarrierCallError::Decode(e.to_string()))?;
        Ok(CarrierReply::Body(body))
    }
}
