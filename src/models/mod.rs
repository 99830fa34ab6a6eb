//! Models for the Guild Wars 2 API and the overlay's own payloads.
//!
//! Upstream bodies (wallet, item, price) are deserialized here and
//! reduced to the few fields the overlay needs; the response payloads
//! served by this crate live in [`overlay`].

pub mod item;
pub mod overlay;
pub mod price;
pub mod wallet;

pub use item::Item;
pub use overlay::{GoldData, GoldDataQuery, GoldQuery, Meta};
pub use price::{PriceQuote, PriceResponse};
pub use wallet::{GOLD_CURRENCY_ID, WalletEntry};
