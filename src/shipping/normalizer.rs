//! Turns whatever the carrier aggregator answered into a [`QuoteResult`].
//!
//! The aggregator has been seen answering with a bare list of options, with
//! the list wrapped in `data` or `shipping_options`, with a single option
//! object, and with error envelopes that still carry options next to the
//! error. Each shape is handled by one extractor; they run in a fixed order
//! and the first one that yields a usable option wins.

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::aggregates::{NormalizedOption, QuoteResult, RawCarrierOption};
use crate::ShippingError;

/// Attempts one envelope shape. `None` means the shape does not apply.
pub type Extractor = fn(&Value) -> Option<Vec<RawCarrierOption>>;

pub const EXTRACTORS: [(&str, Extractor); 4] = [
    ("list", bare_list),
    ("data", data_envelope),
    ("shipping_options", shipping_options_envelope),
    ("single_option", single_option),
];

/// Outcome of normalization. An empty answer is an expected result, not an error.
#[derive(Clone, Debug, PartialEq)]
pub enum Normalized {
    Quoted(QuoteResult),
    NoOptionsAvailable { upstream_error: Option<String> },
}

impl Normalized {
    pub fn into_result(self) -> crate::Result<QuoteResult> {
        match self {
            Self::Quoted(quote) => Ok(quote),
            Self::NoOptionsAvailable { upstream_error } => Err(ShippingError::NoOptionsAvailable { upstream_error }),
        }
    }
}

pub fn normalize(body: &Value) -> Normalized {
    let upstream_error = upstream_error(body);
    if let Some(err) = &upstream_error {
        warn!(upstream_error = %err, "carrier answered with an error envelope, looking for options anyway");
    }

    let candidates = extract_candidates(body);
    let options: Vec<NormalizedOption> = candidates.iter().filter_map(NormalizedOption::from_raw).collect();

    match select(options) {
        Some(quote) => Normalized::Quoted(quote),
        None => Normalized::NoOptionsAvailable { upstream_error },
    }
}

/// Runs the extractors in order and returns the first non-empty candidate list.
pub fn extract_candidates(body: &Value) -> Vec<RawCarrierOption> {
    for (shape, extract) in EXTRACTORS {
        if let Some(candidates) = extract(body).filter(|c| !c.is_empty()) {
            debug!(shape, count = candidates.len(), "extracted carrier options");
            return candidates;
        }
    }
    debug!("no usable carrier options in response");
    Vec::new()
}

/// Picks cheapest and fastest. Ties go to the option seen first.
pub fn select(options: Vec<NormalizedOption>) -> Option<QuoteResult> {
    let cheapest = options.iter().min_by(|a, b| a.price.total_cmp(&b.price))?.clone();
    let fastest = options.iter().min_by_key(|o| o.delivery_time)?.clone();
    let fastest = (fastest.id != cheapest.id).then_some(fastest);
    Some(QuoteResult { cheapest, fastest, all_options: options })
}

/// Text of the first set `error`, `message` or `errors` field. Empty strings, `false` and `0` do not count.
pub fn upstream_error(body: &Value) -> Option<String> {
    let record = body.as_object()?;
    ["error", "message", "errors"].iter().find_map(|key| match record.get(*key)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    })
}

fn valid_options(entries: &[Value]) -> Vec<RawCarrierOption> {
    let options: Vec<RawCarrierOption> = entries
        .iter()
        .filter_map(RawCarrierOption::from_value)
        .filter(|o| o.price_value().is_some())
        .collect();
    if options.len() < entries.len() {
        debug!(dropped = entries.len() - options.len(), "discarded malformed carrier options");
    }
    options
}

fn bare_list(body: &Value) -> Option<Vec<RawCarrierOption>> {
    body.as_array().map(|entries| valid_options(entries))
}

fn data_envelope(body: &Value) -> Option<Vec<RawCarrierOption>> {
    body.as_object()?.get("data")?.as_array().map(|entries| valid_options(entries))
}

fn shipping_options_envelope(body: &Value) -> Option<Vec<RawCarrierOption>> {
    body.as_object()?.get("shipping_options")?.as_array().map(|entries| valid_options(entries))
}

/// Not tried on error envelopes.
fn single_option(body: &Value) -> Option<Vec<RawCarrierOption>> {
    let record = body.as_object()?;
    if upstream_error(body).is_some() || !record.contains_key("id") || !record.contains_key("price") {
        return None;
    }
    Some(valid_options(std::slice::from_ref(body)))
}
