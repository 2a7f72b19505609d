//! The planting wall domain entity.
//!
//! The wall is a fixed `rows × columns` grid of [`Slot`]s stored in row-major
//! order.  It implements the two rules everything else builds on:
//!
//! - **distribution** – spreading an imported order list evenly over the slots;
//! - **resolution** – finding the slot that holds the order matching a scan.

use thiserror::Error;
use tracing::debug;

use super::order::OrderRecord;
use super::slot::{Slot, SlotPosition};

/// Errors that can occur when building or addressing the wall.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WallError {
    /// A wall needs at least one row and one column.
    #[error("wall must have at least one row and one column (got {rows}x{columns})")]
    EmptyGrid { rows: usize, columns: usize },

    /// The position lies outside the grid.
    #[error("slot position {0} is outside the wall")]
    OutOfBounds(SlotPosition),
}

/// Why a scan could not be resolved to a slot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// The scanned text was empty or whitespace only.  No slot was inspected.
    #[error("scan input is empty")]
    EmptyInput,

    /// No slot holds an order with this code or order ID.
    #[error("no order matches code {0:?}")]
    NotFound(String),
}

impl ScanError {
    /// Stable category name reported to the presentation layer.
    pub fn kind(&self) -> &'static str {
        match self {
            ScanError::EmptyInput => "empty_input",
            ScanError::NotFound(_) => "not_found",
        }
    }
}

/// The grid of slots.
///
/// Every `(row, column)` with `row < rows` and `column < columns` has exactly
/// one slot for the lifetime of the wall.
#[derive(Debug, Clone)]
pub struct Wall {
    rows: usize,
    columns: usize,
    /// Row-major: index = `row * columns + column`.
    slots: Vec<Slot>,
}

impl Wall {
    /// Creates a wall of empty slots.
    ///
    /// # Errors
    ///
    /// Returns [`WallError::EmptyGrid`] if either dimension is zero.
    pub fn new(rows: usize, columns: usize) -> Result<Self, WallError> {
        if rows == 0 || columns == 0 {
            return Err(WallError::EmptyGrid { rows, columns });
        }
        let slots = (0..rows)
            .flat_map(|row| (0..columns).map(move |column| Slot::new(row, column)))
            .collect();
        Ok(Self {
            rows,
            columns,
            slots,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// All slots in row-major order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    /// Returns the slot at `position`, or `None` if it lies outside the grid.
    pub fn slot(&self, position: SlotPosition) -> Option<&Slot> {
        self.index_of(position).map(|i| &self.slots[i])
    }

    /// Total number of orders currently on the wall.
    pub fn order_count(&self) -> usize {
        self.slots.iter().map(Slot::len).sum()
    }

    /// Empties every slot.
    pub fn clear_all(&mut self) {
        for slot in &mut self.slots {
            slot.clear_all();
        }
    }

    /// Replaces the wall contents with `orders`, spread evenly over the slots.
    ///
    /// All slots are cleared first.  The first pass gives each slot, in
    /// row-major order, one order until either every slot has one or the
    /// input runs out.  Remaining orders then continue cyclically in the same
    /// order, wrapping from the last slot back to the first.  Slot counts
    /// therefore differ by at most one and the result depends only on the
    /// input order.
    pub fn distribute_orders(&mut self, orders: Vec<OrderRecord>) {
        self.clear_all();

        let total = orders.len();
        let mut remaining = orders.into_iter();

        // One order per slot.
        for (slot, order) in self.slots.iter_mut().zip(remaining.by_ref()) {
            slot.add(order);
        }

        // Overflow, wrapping around the grid.
        for (slot_index, order) in (0..self.slots.len()).cycle().zip(remaining) {
            self.slots[slot_index].add(order);
        }

        debug!(
            orders = total,
            slots = self.slots.len(),
            "distributed orders across wall"
        );
    }

    /// Finds the slot holding an order whose code or order ID equals `code`.
    ///
    /// The input is trimmed first.  Slots are searched in row-major order and
    /// the search stops at the first match, so with duplicate codes the
    /// earliest slot wins.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::EmptyInput`] for blank input without inspecting
    /// any slot, and [`ScanError::NotFound`] if no slot matches.
    pub fn resolve(&self, code: &str) -> Result<SlotPosition, ScanError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ScanError::EmptyInput);
        }
        self.slots
            .iter()
            .find(|slot| slot.matches(code))
            .map(Slot::position)
            .ok_or_else(|| ScanError::NotFound(code.to_string()))
    }

    /// Like [`Wall::resolve`] but hands back the matched slot for mutation,
    /// typically to highlight it.
    ///
    /// # Errors
    ///
    /// Same as [`Wall::resolve`].
    pub fn resolve_mut(&mut self, code: &str) -> Result<&mut Slot, ScanError> {
        let position = self.resolve(code)?;
        let index = position.row * self.columns + position.column;
        Ok(&mut self.slots[index])
    }

    /// Sets the slot at `position` to the highlighted state.
    ///
    /// # Errors
    ///
    /// Returns [`WallError::OutOfBounds`] if `position` is outside the grid.
    pub fn highlight(&mut self, position: SlotPosition) -> Result<(), WallError> {
        self.slot_mut(position)?.highlight();
        Ok(())
    }

    /// Removes orders matching `identifier` from the slot at `position` and
    /// returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`WallError::OutOfBounds`] if `position` is outside the grid.
    pub fn remove_order(
        &mut self,
        position: SlotPosition,
        identifier: &str,
    ) -> Result<usize, WallError> {
        Ok(self.slot_mut(position)?.remove(identifier))
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn index_of(&self, position: SlotPosition) -> Option<usize> {
        (position.row < self.rows && position.column < self.columns)
            .then(|| position.row * self.columns + position.column)
    }

    fn slot_mut(&mut self, position: SlotPosition) -> Result<&mut Slot, WallError> {
        let index = self
            .index_of(position)
            .ok_or(WallError::OutOfBounds(position))?;
        Ok(&mut self.slots[index])
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
