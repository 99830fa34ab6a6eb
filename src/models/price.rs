//! Trading post price models (`/v2/commerce/prices`).
//!
//! The endpoint answers with a single object for `/prices/{id}` and with
//! an array for `/prices?ids=...`. [`PriceResponse`] accepts both and
//! [`PriceResponse::into_quote`] collapses them into one optional
//! [`PriceQuote`], so nothing past this module branches on the shape.

use serde::Deserialize;

/// Raw price body in either of its two shapes.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PriceResponse {
    Many(Vec<Price>),
    One(Price),
}

impl PriceResponse {
    /// Returns the quote of the single object, or of the first element
    /// of an array. An empty array yields `None`.
    pub fn into_quote(self) -> Option<PriceQuote> {
        match self {
            Self::One(price) => Some(price.into()),
            Self::Many(prices) => prices.into_iter().next().map(PriceQuote::from),
        }
    }
}

/// Trading post listing summary for one item.
#[derive(Debug, Clone, Deserialize)]
pub struct Price {
    pub id: u32,
    /// Whether the item can be bought by free-to-play accounts.
    #[serde(default)]
    pub whitelisted: bool,
    /// Highest buy order.
    #[serde(default)]
    pub buys: Option<Listing>,
    /// Lowest sell listing.
    #[serde(default)]
    pub sells: Option<Listing>,
}

/// One side of the order book, reduced to its best price.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub quantity: u64,
    /// Unit price in copper.
    #[serde(default)]
    pub unit_price: Option<u64>,
}

/// Best buy and sell unit prices for an item, in copper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceQuote {
    pub buy_unit_price: Option<u64>,
    pub sell_unit_price: Option<u64>,
}

impl From<Price> for PriceQuote {
    fn from(price: Price) -> Self {
        Self {
            buy_unit_price: price.buys.and_then(|l| l.unit_price),
            sell_unit_price: price.sells.and_then(|l| l.unit_price),
        }
    }
}
