//! Carrier quote records: the untrusted upstream shape and the normalized result

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Carrier option ids come back as numbers from most carriers and as strings from a few.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionId {
    Number(i64),
    Text(String),
}

impl OptionId {
    /// Zero, empty strings and non-integral numbers are not usable ids.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().filter(|id| *id != 0).map(Self::Number),
            Value::String(s) if !s.trim().is_empty() => Some(Self::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::Number(n) => write!(f, "{}", n), Self::Text(s) => f.write_str(s) }
    }
}

impl From<i64> for OptionId { fn from(id: i64) -> Self { Self::Number(id) } }
impl From<&str> for OptionId { fn from(id: &str) -> Self { Self::Text(id.to_string()) } }

/// One option as the carrier aggregator sent it, after the structural checks.
///
/// The price is kept as received; it is only turned into a number by
/// [`RawCarrierOption::price_value`].
#[derive(Clone, Debug, PartialEq)]
pub struct RawCarrierOption {
    pub id: OptionId,
    pub name: String,
    pub price: String,
    pub delivery_time: u32,
    pub company: String,
}

impl RawCarrierOption {
    /// Returns `None` unless the record has an id, a price, a name, a
    /// `company.name` and a numeric `delivery_time`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let record = value.as_object()?;
        Some(Self {
            id: OptionId::from_value(record.get("id")?)?,
            price: price_text(record.get("price")?)?,
            name: non_empty(record.get("name")?)?,
            company: non_empty(record.get("company")?.get("name")?)?,
            delivery_time: business_days(record.get("delivery_time")?)?,
        })
    }

    /// Decimal point only. Anything that is not a finite, non-negative number is rejected.
    pub fn price_value(&self) -> Option<f64> {
        self.price.trim().parse::<f64>().ok().filter(|p| p.is_finite() && *p >= 0.0)
    }
}

fn price_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty(value: &Value) -> Option<String> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

fn business_days(value: &Value) -> Option<u32> {
    if let Some(days) = value.as_u64() {
        return u32::try_from(days).ok();
    }
    let days = value.as_f64()?;
    (days >= 0.0 && days.fract() == 0.0 && days <= f64::from(u32::MAX)).then_some(days as u32)
}

/// A shipping option ready to be shown to the customer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedOption {
    pub id: OptionId,
    pub name: String,
    pub company: String,
    pub price: f64,
    pub delivery_time: u32,
}

impl NormalizedOption {
    pub fn from_raw(raw: &RawCarrierOption) -> Option<Self> {
        Some(Self {
            id: raw.id.clone(),
            name: raw.name.clone(),
            company: raw.company.clone(),
            price: raw.price_value()?,
            delivery_time: raw.delivery_time,
        })
    }
}

/// `fastest` is `None` whenever the cheapest option is also the fastest one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResult {
    pub cheapest: NormalizedOption,
    pub fastest: Option<NormalizedOption>,
    pub all_options: Vec<NormalizedOption>,
}

impl QuoteResult {
    pub fn option(&self, id: &OptionId) -> Option<&NormalizedOption> {
        self.all_options.iter().find(|o| &o.id == id)
    }
    pub fn fastest_or_cheapest(&self) -> &NormalizedOption { self.fastest.as_ref().unwrap_or(&self.cheapest) }
}
