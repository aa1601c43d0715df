//! Cart Aggregate

use rust_decimal::Decimal;
use crate::domain::aggregates::quote::{NormalizedOption, OptionId, QuoteResult};
use crate::domain::value_objects::Money;

#[derive(Clone, Debug)]
pub struct Cart {
    items: Vec<CartItem>,
    subtotal: Money,
    discount: Money,
    currency: String,
    shipping_quote: Option<QuoteResult>,
    selected_shipping: Option<NormalizedOption>,
}

#[derive(Clone, Debug)]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
}

impl CartItem {
    pub fn line_total(&self) -> Money { self.unit_price.multiply(self.quantity) }
}

impl Cart {
    pub fn new(currency: &str) -> Self {
        Self {
            items: vec![], subtotal: Money::zero(currency), discount: Money::zero(currency),
            currency: currency.to_string(), shipping_quote: None, selected_shipping: None,
        }
    }

    pub fn items(&self) -> &[CartItem] { &self.items }
    pub fn subtotal(&self) -> &Money { &self.subtotal }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn shipping_quote(&self) -> Option<&QuoteResult> { self.shipping_quote.as_ref() }
    pub fn selected_shipping(&self) -> Option<&NormalizedOption> { self.selected_shipping.as_ref() }

    pub fn add_item(&mut self, item: CartItem) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == item.product_id) {
            existing.quantity += item.quantity;
        } else {
            self.items.push(item);
        }
        self.recalculate();
    }

    pub fn update_quantity(&mut self, product_id: &str, quantity: u32) -> Result<(), CartError> {
        let item = self.items.iter_mut().find(|i| i.product_id == product_id).ok_or(CartError::ItemNotFound)?;
        if quantity == 0 { self.items.retain(|i| i.product_id != product_id); }
        else { item.quantity = quantity; }
        self.recalculate();
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: &str) -> Result<(), CartError> {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        if self.items.len() == before { return Err(CartError::ItemNotFound); }
        self.recalculate();
        Ok(())
    }

    pub fn clear(&mut self) { self.items.clear(); self.recalculate(); }

    /// Shipping is quoted for the first item of the cart.
    pub fn quote_item_id(&self) -> Result<&str, CartError> {
        self.items.first().map(|i| i.product_id.as_str()).ok_or(CartError::Empty)
    }

    /// Replaces any previous quote and preselects the cheapest option.
    pub fn apply_quote(&mut self, quote: QuoteResult) {
        self.selected_shipping = Some(quote.cheapest.clone());
        self.shipping_quote = Some(quote);
    }

    pub fn select_shipping(&mut self, id: &OptionId) -> Result<(), CartError> {
        let quote = self.shipping_quote.as_ref().ok_or(CartError::NoQuote)?;
        let option = quote.option(id).ok_or(CartError::UnknownShippingOption)?.clone();
        self.selected_shipping = Some(option);
        Ok(())
    }

    pub fn apply_discount(&mut self, discount: Money) -> Result<(), CartError> {
        if discount.currency() != self.currency { return Err(CartError::CurrencyMismatch); }
        self.discount = discount;
        Ok(())
    }

    /// Zero until an option is selected.
    pub fn shipping_cost(&self) -> Money {
        self.selected_shipping.as_ref()
            .and_then(|o| Money::from_f64(o.price, &self.currency))
            .unwrap_or_else(|| Money::zero(&self.currency))
    }

    pub fn total(&self) -> Money {
        let gross = self.subtotal.add(&self.shipping_cost()).unwrap_or_else(|_| self.subtotal.clone());
        let net = gross.subtract(&self.discount).unwrap_or(gross);
        Money::new(net.amount().max(Decimal::ZERO), &self.currency)
    }

    fn recalculate(&mut self) {
        self.subtotal = self.items.iter().fold(Money::zero(&self.currency), |acc, i| acc.add(&i.line_total()).unwrap_or(acc));
        // Quotes are tied to the item they were computed for.
        self.shipping_quote = None;
        self.selected_shipping = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum CartError { ItemNotFound, Empty, NoQuote, UnknownShippingOption, CurrencyMismatch }
impl std::error::Error for CartError {}
impl std::fmt::Display for CartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemNotFound => write!(f, "Item not found"),
            Self::Empty => write!(f, "Cart is empty"),
            Self::NoQuote => write!(f, "Shipping has not been quoted"),
            Self::UnknownShippingOption => write!(f, "Unknown shipping option"),
            Self::CurrencyMismatch => write!(f, "Currency mismatch"),
        }
    }
}
