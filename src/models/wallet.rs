//! Account wallet models (`/v2/account/wallet`).

use serde::Deserialize;

/// Currency id of gold in the wallet.
pub const GOLD_CURRENCY_ID: u32 = 1;

/// A single currency balance from the caller's wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WalletEntry {
    #[serde(rename = "id")]
    pub currency_id: u32,
    /// Balance in minor units (copper for gold).
    #[serde(rename = "value")]
    pub amount: u64,
}
