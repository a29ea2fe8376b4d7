//! Cart items priced from lesson slots.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{LessonSlot, SlotId, SlotTime};

/// One lesson slot selected for purchase.
///
/// The price is fixed when the item enters the cart, so a later pricing change
/// cannot reprice a checkout already in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub slot_id: SlotId,
    pub date: NaiveDate,
    pub time: SlotTime,
    pub duration_minutes: u32,
    /// Price in cents.
    pub price_cents: u64,
}

impl CartItem {
    /// Prices `slot` at a flat per-minute rate.
    pub fn from_slot(slot: &LessonSlot, per_minute_cents: u64) -> Self {
        Self {
            slot_id: slot.id,
            date: slot.date,
            time: slot.time,
            duration_minutes: slot.duration_minutes,
            price_cents: u64::from(slot.duration_minutes) * per_minute_cents,
        }
    }
}

/// Total of `items` in cents.
pub fn cart_total(items: &[CartItem]) -> u64 {
    items.iter().map(|item| item.price_cents).sum()
}
