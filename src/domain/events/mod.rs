//! Domain events
use serde::Serialize;

pub const QUOTE_COMPLETED_SUBJECT: &str = "shipping.quote.completed";
pub const QUOTE_FAILED_SUBJECT: &str = "shipping.quote.failed";

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShippingEvent {
    QuoteCompleted { product_id: String, destination: String, option_count: usize, cheapest_price: f64 },
    QuoteFailed { product_id: Option<String>, destination: Option<String>, code: String },
}

impl ShippingEvent {
    pub fn subject(&self) -> &'static str {
        match self { Self::QuoteCompleted { .. } => QUOTE_COMPLETED_SUBJECT, Self::QuoteFailed { .. } => QUOTE_FAILED_SUBJECT }
    }
}
