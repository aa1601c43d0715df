//! Value Objects for shipping

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const POSTAL_CODE_DIGITS: usize = 8;

/// Brazilian postal code (CEP), stored as its 8 digits
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    /// Accepts any formatting ("89010-100", "89.010 100", ...) as long as exactly 8 digits remain.
    pub fn parse(raw: &str) -> Result<Self, PostalCodeError> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() != POSTAL_CODE_DIGITS { return Err(PostalCodeError::WrongLength(digits.len())); }
        Ok(Self(digits))
    }
    /// For compile-time constants known to be 8 digits.
    pub(crate) fn from_static(digits: &'static str) -> Self {
        debug_assert!(digits.len() == POSTAL_CODE_DIGITS && digits.bytes().all(|b| b.is_ascii_digit()));
        Self(digits.to_string())
    }
    pub fn digits(&self) -> &str { &self.0 }

    /// Input mask used by the storefront: digits only, hyphen after the fifth, capped at 8.
    pub fn format_partial(raw: &str) -> String {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).take(POSTAL_CODE_DIGITS).collect();
        if digits.len() <= 5 { return digits; }
        format!("{}-{}", &digits[..5], &digits[5..])
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}-{}", &self.0[..5], &self.0[5..]) }
}

impl TryFrom<String> for PostalCode {
    type Error = PostalCodeError;
    fn try_from(value: String) -> Result<Self, Self::Error> { Self::parse(&value) }
}

impl From<PostalCode> for String { fn from(code: PostalCode) -> Self { code.0 } }

#[derive(Debug, Clone, PartialEq, Eq)] pub enum PostalCodeError { WrongLength(usize) }
impl std::error::Error for PostalCodeError {}
impl fmt::Display for PostalCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::WrongLength(n) => write!(f, "postal code must have {} digits, got {}", POSTAL_CODE_DIGITS, n) }
    }
}

/// Physical package measurements: centimetres and kilograms
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dimensions { height: f64, width: f64, length: f64, weight: f64 }

impl Dimensions {
    /// Every field must be present, finite and strictly positive. No defaults are filled in.
    pub fn from_parts(height: Option<f64>, width: Option<f64>, length: Option<f64>, weight: Option<f64>) -> Result<Self, DimensionsError> {
        Ok(Self {
            height: measured("height", height)?,
            width: measured("width", width)?,
            length: measured("length", length)?,
            weight: measured("weight", weight)?,
        })
    }
    pub fn height(&self) -> f64 { self.height }
    pub fn width(&self) -> f64 { self.width }
    pub fn length(&self) -> f64 { self.length }
    pub fn weight(&self) -> f64 { self.weight }
}

fn measured(field: &'static str, value: Option<f64>) -> Result<f64, DimensionsError> {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(DimensionsError::Missing(field)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum DimensionsError { Missing(&'static str) }
impl std::error::Error for DimensionsError {}
impl fmt::Display for DimensionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::Missing(field) => write!(f, "missing or non-positive {}", field) }
    }
}

/// Money value object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money { amount: Decimal, currency: String }

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self { Self { amount, currency: currency.to_string() } }
    pub fn brl(amount: Decimal) -> Self { Self::new(amount, "BRL") }
    pub fn zero(currency: &str) -> Self { Self::new(Decimal::ZERO, currency) }
    /// Carrier prices arrive as floats; money is kept to the cent.
    pub fn from_f64(amount: f64, currency: &str) -> Option<Self> {
        Decimal::from_f64_retain(amount).map(|d| Self::new(d.round_dp(2), currency))
    }
    pub fn amount(&self) -> Decimal { self.amount }
    pub fn currency(&self) -> &str { &self.currency }
    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency { return Err(MoneyError::CurrencyMismatch); }
        Ok(Money::new(self.amount + other.amount, &self.currency))
    }
    pub fn subtract(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency { return Err(MoneyError::CurrencyMismatch); }
        Ok(Money::new(self.amount - other.amount, &self.currency))
    }
    pub fn multiply(&self, qty: u32) -> Money { Money::new(self.amount * Decimal::from(qty), &self.currency) }
}

impl Default for Money { fn default() -> Self { Self::zero("BRL") } }

#[derive(Debug, Clone, PartialEq, Eq)] pub enum MoneyError { CurrencyMismatch }
impl std::error::Error for MoneyError {}
impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Currency mismatch") }
}
