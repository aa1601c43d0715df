//! Shipping quotes: carrier client, fetcher and response normalization
pub mod carrier;
pub mod fetcher;
pub mod normalizer;

pub use carrier::{CarrierApi, CarrierCallError, CarrierReply, HttpCarrierClient, QuotePayload};
pub use fetcher::{QuoteFetcher, ShippingRequest};
pub use normalizer::{normalize, Normalized};
