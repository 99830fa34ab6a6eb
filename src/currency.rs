//! Copper to gold conversion and target selection.

use crate::models::{PriceQuote, WalletEntry};
use crate::{OverlayError, Result};

/// Copper per gold (100 copper per silver, 100 silver per gold).
pub const COPPER_PER_GOLD: u64 = 100 * 100;

/// Converts copper to whole gold, rounding down.
pub const fn to_display_units(copper: u64) -> u64 {
    copper / COPPER_PER_GOLD
}

/// Finds the balance of `currency_id` in a wallet.
///
/// # Errors
///
/// Returns [`OverlayError::WalletCurrencyMissing`] when the wallet has no
/// entry for the currency.
pub fn wallet_balance(wallet: &[WalletEntry], currency_id: u32) -> Result<u64> {
    wallet
        .iter()
        .find(|entry| entry.currency_id == currency_id)
        .map(|entry| entry.amount)
        .ok_or(OverlayError::WalletCurrencyMissing(currency_id))
}

/// Picks the target amount in gold.
///
/// The sell price wins over the buy price when both are listed; with
/// neither, `fallback` is returned unchanged. A unit price of zero counts
/// as not listed.
pub fn resolve_target(quote: Option<&PriceQuote>, fallback: u64) -> u64 {
    let Some(quote) = quote else {
        return fallback;
    };

    let mut target = fallback;
    if let Some(buy) = quote.buy_unit_price.filter(|p| *p > 0) {
        target = to_display_units(buy);
    }
    if let Some(sell) = quote.sell_unit_price.filter(|p| *p > 0) {
        target = to_display_units(sell);
    }
    target
}
