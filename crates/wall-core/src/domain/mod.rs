//! Domain entities for the planting wall.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers.  The innermost
//! layer is called the **domain** (or "entities" layer).  Domain code:
//!
//! - Contains the core business rules of the application.
//! - Has **no** imports from timers, audio devices, or UI frameworks.
//! - Can be compiled and tested on any platform without any external setup.
//! - Defines the data types and operations that make the system what it is:
//!   here, a grid of slots that orders are spread across and picked from.
//!
//! Code in outer layers (application, infrastructure, UI) depends on the
//! domain, but the domain never depends on them.

/// A single imported order.
pub mod order;

/// One pigeonhole of the wall and its display state.
pub mod slot;

/// The full grid: distribution and scan resolution.
///
/// See [`wall::Wall`] for the main type.
pub mod wall;

/// Case-insensitive comparison used for every identifier match.
///
/// Compares character by character after one-to-one uppercase folding, which
/// is locale independent and never allocates.  A character whose uppercase
/// form is several characters (`ß` → `SS`) is compared unchanged, so strings
/// of different lengths never match.
pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars().map(fold_char).eq(b.chars().map(fold_char))
}

fn fold_char(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}
