//! Item detail models (`/v2/items/{id}`).

use serde::Deserialize;

/// The parts of an item record the overlay renders.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Item {
    pub id: u32,
    /// Display name in the API's default language.
    pub name: String,
    /// Absolute URL of the item's icon.
    pub icon: String,
}
