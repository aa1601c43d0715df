//! Aggregates module
pub mod item;
pub mod quote;
pub mod cart;

pub use item::ShippableItem;
pub use quote::{NormalizedOption, OptionId, QuoteResult, RawCarrierOption};
pub use cart::{Cart, CartError, CartItem};
