//! Storefront shipping quotes
//!
//! Server side of the storefront's "calculate shipping" action.
//!
//! ## Features
//! - Postal code and package validation before any upstream call
//! - Carrier aggregator quoting over HTTP
//! - Tolerant normalization of the aggregator's response envelopes
//! - Cheapest / fastest option selection
//! - Cart shipping selection and totals
//! - WhatsApp handoff links for cases that need a human

use thiserror::Error;

pub mod api;
pub mod config;
pub mod domain;
pub mod messaging;
pub mod shipping;
pub mod store;

pub use config::ShippingConfig;
pub use domain::aggregates::{NormalizedOption, OptionId, QuoteResult};
pub use shipping::{QuoteFetcher, ShippingRequest};

// =============================================================================
// Error Types
// =============================================================================

/// Every way a quote request can end without options.
///
/// None of these are fatal: they are rendered to the storefront as
/// `{error, message}` by [`api`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShippingError {
    #[error("Malformed shipping request: {0}")]
    InvalidRequest(String),

    #[error("Invalid postal code: {0}")]
    InvalidPostalCode(String),

    #[error("Item {0} not found")]
    ItemNotFound(String),

    #[error("Item {item_id} has no {field}")]
    MissingDimensions { item_id: String, field: &'static str },

    #[error("Carrier API credential not configured")]
    CarrierServiceUnavailable,

    #[error("Carrier rejected the destination with status {status}")]
    UnserviceableAddress { status: u16 },

    #[error("Carrier API error: {0}")]
    CarrierApiError(String),

    #[error("No shipping options available")]
    NoOptionsAvailable { upstream_error: Option<String> },
}

impl ShippingError {
    /// Stable code sent in the `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "InvalidRequest",
            Self::InvalidPostalCode(_) => "InvalidPostalCode",
            Self::ItemNotFound(_) => "ItemNotFound",
            Self::MissingDimensions { .. } => "MissingDimensions",
            Self::CarrierServiceUnavailable => "CarrierServiceUnavailable",
            Self::UnserviceableAddress { .. } => "UnserviceableAddress",
            Self::CarrierApiError(_) => "CarrierApiError",
            Self::NoOptionsAvailable { .. } => "NoOptionsAvailable",
        }
    }

    /// Text shown verbatim to the customer.
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "We could not process this request. Please contact us on WhatsApp for a shipping quote.",
            Self::InvalidPostalCode(_) => "Please check the postal code you entered. It must have 8 digits.",
            Self::ItemNotFound(_) => "We could not find this product's details. Please contact us on WhatsApp.",
            Self::MissingDimensions { .. } => "Shipping for this product has to be quoted by our team. Please contact us on WhatsApp.",
            Self::CarrierServiceUnavailable => "Shipping quotes are temporarily unavailable. Please contact us on WhatsApp for a quote.",
            Self::UnserviceableAddress { .. } => "For this address, please contact us on WhatsApp to arrange delivery.",
            Self::CarrierApiError(_) => "We could not calculate shipping right now. Please contact us on WhatsApp.",
            Self::NoOptionsAvailable { upstream_error: Some(_) } => "For local deliveries, please contact us on WhatsApp to arrange pickup or delivery.",
            Self::NoOptionsAvailable { upstream_error: None } => "No shipping option is available for this postal code. Please contact us on WhatsApp to arrange delivery.",
        }
    }

    /// True for failures detected before any upstream call.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidRequest(_) | Self::InvalidPostalCode(_))
    }
}

pub type Result<T> = std::result::Result<T, ShippingError>;
