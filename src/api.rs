//! HTTP surface
//!
//! The storefront renders `message` from whatever comes back and does not
//! look at the status line, so every shipping answer is a 200. The error
//! taxonomy is flattened to `{error, message}` here and nowhere else.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use crate::domain::events::ShippingEvent;
use crate::messaging::ContactLinks;
use crate::shipping::{QuoteFetcher, ShippingRequest};
use crate::{QuoteResult, ShippingError};

#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<QuoteFetcher>,
    pub contacts: Option<ContactLinks>,
    pub nats: Option<async_nats::Client>,
}

impl AppState {
    pub fn new(fetcher: QuoteFetcher) -> Self {
        Self { fetcher: Arc::new(fetcher), contacts: None, nats: None }
    }
    pub fn with_contacts(mut self, contacts: Option<ContactLinks>) -> Self { self.contacts = contacts; self }
    pub fn with_nats(mut self, nats: Option<async_nats::Client>) -> Self { self.nats = nats; self }

    async fn publish(&self, event: ShippingEvent) {
        let Some(nats) = &self.nats else { return };
        let payload = match serde_json::to_vec(&event) {
            Ok(p) => p,
            Err(e) => { warn!("could not encode {:?}: {}", event, e); return; }
        };
        if let Err(e) = nats.publish(event.subject().to_string(), payload.into()).await {
            warn!("could not publish {}: {}", event.subject(), e);
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "storefront-shipping"})) }))
        .route("/functions/v1/calculate-shipping", post(calculate_shipping))
        .route("/api/v1/shipping/quote", post(calculate_shipping))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `{error, message}` plus a WhatsApp link when one is configured.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: &'static str,
    #[serde(rename = "contactUrl", skip_serializing_if = "Option::is_none")]
    pub contact_url: Option<String>,
}

impl From<&ShippingError> for ErrorBody {
    fn from(err: &ShippingError) -> Self {
        Self { error: err.code(), message: err.message(), contact_url: None }
    }
}

impl IntoResponse for ErrorBody {
    fn into_response(self) -> Response { (StatusCode::OK, Json(self)).into_response() }
}

impl IntoResponse for ShippingError {
    fn into_response(self) -> Response { ErrorBody::from(&self).into_response() }
}

async fn calculate_shipping(State(s): State<AppState>, body: Result<Json<ShippingRequest>, JsonRejection>) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("unreadable shipping request: {}", rejection.body_text());
            let err = ShippingError::InvalidRequest(rejection.body_text());
            s.publish(ShippingEvent::QuoteFailed { product_id: None, destination: None, code: err.code().to_string() }).await;
            let mut body = ErrorBody::from(&err);
            body.contact_url = s.contacts.as_ref().map(ContactLinks::general);
            return body.into_response();
        }
    };

    match s.fetcher.quote(&request).await {
        Ok(quote) => {
            s.publish(completed(&request, &quote)).await;
            Json(quote).into_response()
        }
        Err(err) => {
            s.publish(ShippingEvent::QuoteFailed {
                product_id: Some(request.product_id.clone()).filter(|p| !p.is_empty()),
                destination: Some(request.cep.clone()).filter(|c| !c.is_empty()),
                code: err.code().to_string(),
            }).await;
            error_response(&s, &err, &request)
        }
    }
}

fn completed(request: &ShippingRequest, quote: &QuoteResult) -> ShippingEvent {
    ShippingEvent::QuoteCompleted {
        product_id: request.product_id.clone(),
        destination: request.cep.clone(),
        option_count: quote.all_options.len(),
        cheapest_price: quote.cheapest.price,
    }
}

fn error_response(s: &AppState, err: &ShippingError, request: &ShippingRequest) -> Response {
    let mut body = ErrorBody::from(err);
    body.contact_url = s.contacts.as_ref().map(|c| c.shipping_help(request));
    body.into_response()
}
