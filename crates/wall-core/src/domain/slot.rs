//! A single slot of the planting wall.
//!
//! A slot is addressed by a fixed `(row, column)` pair and holds any number of
//! orders in insertion order.  It also carries the tri-state visual state the
//! rendering layer reads after each mutation.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::order::OrderRecord;

/// Zero-based coordinates of a slot inside the wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotPosition {
    pub row: usize,
    pub column: usize,
}

impl SlotPosition {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Coordinate label shown on an empty slot, 1-based (e.g. `格口 1-2`).
    pub fn label(&self) -> String {
        format!("格口 {}-{}", self.row + 1, self.column + 1)
    }

    /// Spoken location of the slot, 1-based (e.g. `2行3列` for row 2, column 3).
    pub fn announcement(&self) -> String {
        format!("{}行{}列", self.row + 1, self.column + 1)
    }
}

impl fmt::Display for SlotPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Visual state of a slot.
///
/// `Normal` and `Occupied` follow from the slot contents; `Highlighted` is
/// only entered through [`Slot::highlight`] and lasts until the next
/// add, remove or clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    /// No orders.
    Normal,
    /// At least one order.
    Occupied,
    /// A scan was just resolved to this slot.
    Highlighted,
}

/// One pigeonhole of the wall.
#[derive(Debug, Clone)]
pub struct Slot {
    position: SlotPosition,
    orders: Vec<OrderRecord>,
    state: SlotState,
}

impl Slot {
    /// Creates an empty slot at `(row, column)`.
    pub fn new(row: usize, column: usize) -> Self {
        Self {
            position: SlotPosition::new(row, column),
            orders: Vec::new(),
            state: SlotState::Normal,
        }
    }

    pub fn position(&self) -> SlotPosition {
        self.position
    }

    pub fn row(&self) -> usize {
        self.position.row
    }

    pub fn column(&self) -> usize {
        self.position.column
    }

    /// Orders currently held, in insertion order.
    pub fn orders(&self) -> &[OrderRecord] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn state(&self) -> SlotState {
        self.state
    }

    /// Appends an order to the end of the slot.
    pub fn add(&mut self, order: OrderRecord) {
        self.orders.push(order);
        self.refresh_state();
    }

    /// Removes every order whose code or order ID equals `identifier`
    /// (case-insensitive) and returns how many were removed.
    ///
    /// Removing an identifier that is not present is a no-op.
    pub fn remove(&mut self, identifier: &str) -> usize {
        let before = self.orders.len();
        self.orders.retain(|order| !order.matches(identifier));
        self.refresh_state();
        before - self.orders.len()
    }

    /// Removes all orders.
    pub fn clear_all(&mut self) {
        self.orders.clear();
        self.refresh_state();
    }

    /// Returns `true` if any held order matches `identifier` by code or order ID.
    pub fn matches(&self, identifier: &str) -> bool {
        self.orders.iter().any(|order| order.matches(identifier))
    }

    /// Marks the slot as the target of the most recent scan.
    pub fn highlight(&mut self) {
        self.state = SlotState::Highlighted;
    }

    /// Text shown on the slot.
    ///
    /// - empty: the coordinate label
    /// - one order: that order's detail text
    /// - several orders: the coordinate label followed by one order ID per line
    pub fn display_label(&self) -> String {
        match self.orders.as_slice() {
            [] => self.position.label(),
            [only] => only.to_string(),
            many => {
                let mut label = self.position.label();
                for order in many {
                    label.push('\n');
                    label.push_str(&order.order_id);
                }
                label
            }
        }
    }

    fn refresh_state(&mut self) {
        self.state = if self.orders.is_empty() {
            SlotState::Normal
        } else {
            SlotState::Occupied
        };
    }
}
