//! WhatsApp handoff links
//!
//! Every dead end of the quote flow sends the customer to the store's
//! WhatsApp. The link carries a pre-filled message so the operator knows
//! which product and destination the customer was asking about.

use url::Url;

use crate::shipping::ShippingRequest;

#[derive(Clone, Debug)]
pub struct ContactLinks { base: Url }

impl ContactLinks {
    /// Keeps the digits of `number` (country code included). `None` if nothing usable is left.
    pub fn new(number: &str) -> Option<Self> {
        let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() { return None; }
        let base = Url::parse(&format!("https://wa.me/{}", digits)).ok()?;
        Some(Self { base })
    }

    pub fn link(&self, text: &str) -> String {
        let mut url = self.base.clone();
        url.query_pairs_mut().append_pair("text", text);
        url.to_string()
    }

    pub fn general(&self) -> String { self.link("Hello! I would like more information.") }

    /// Falls back to [`general`](Self::general) when the request names neither product nor destination.
    pub fn shipping_help(&self, request: &ShippingRequest) -> String {
        let text = match (request.product_id.trim(), request.cep.trim()) {
            ("", "") => return self.general(),
            (product, "") => format!("Hello! I would like a shipping quote for product {}.", product),
            ("", cep) => format!("Hello! I would like a shipping quote to postal code {}.", cep),
            (product, cep) => format!("Hello! I would like a shipping quote for product {} to postal code {}.", product, cep),
        };
        self.link(&text)
    }
}
