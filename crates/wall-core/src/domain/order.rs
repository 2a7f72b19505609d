//! The order record entity.
//!
//! An [`OrderRecord`] is one data row of an imported order file.  Records are
//! created in a batch by the CSV reader and never modified afterwards; they
//! are only moved into slots and eventually dropped when picked.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::eq_ignore_case;

/// A single order to be placed on the wall and later picked by scanning.
///
/// Neither `order_id` nor `code` is required to be unique: duplicate rows are
/// legal input and matching simply stops at the first hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Order number from the first column.
    pub order_id: String,
    /// Product description.
    pub product_name: String,
    /// The scannable identifier printed on the parcel (a QR code payload).
    pub code: String,
    /// Ordered quantity; `1` when the source value was not an integer.
    pub quantity: i32,
    /// Customer display name.
    pub customer_name: String,
    /// Order timestamp; the import time when the source value was not a date.
    pub order_date: NaiveDateTime,
}

impl OrderRecord {
    /// Returns `true` if `identifier` equals this order's code or its order ID,
    /// ignoring case.
    pub fn matches(&self, identifier: &str) -> bool {
        eq_ignore_case(&self.code, identifier) || eq_ignore_case(&self.order_id, identifier)
    }
}

impl fmt::Display for OrderRecord {
    /// Full detail text shown when the order is alone in its slot.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "订单: {}\n产品: {}\n数量: {}\n客户: {}",
            self.order_id, self.product_name, self.quantity, self.customer_name
        )
    }
}
