//! # wall-core
//!
//! Shared library for the planting wall containing the order record, the slot
//! grid ("wall") with its distribution and scan-resolution rules, and the CSV
//! order reader.
//!
//! This crate is used by the station application.  It has no dependencies on
//! an async runtime, UI frameworks, or audio output.
//!
//! # Architecture overview (for beginners)
//!
//! A planting wall is a shelf of pigeonholes ("slots") arranged in rows and
//! columns.  Orders are imported from a spreadsheet export, spread evenly over
//! the slots, and then picked one at a time: the operator scans the code on a
//! parcel, the wall tells them which slot the matching order lives in, and the
//! order is cleared from that slot shortly afterwards.
//!
//! This crate (`wall-core`) is the shared foundation.  It defines:
//!
//! - **`domain`** – Pure business logic.  [`OrderRecord`] is one imported
//!   order, [`Slot`] is one pigeonhole holding any number of orders, and
//!   [`Wall`] is the full grid that distributes orders and resolves scans.
//!
//! - **`csv`** – How order files are read.  A deliberately forgiving parser
//!   turns loosely formatted comma-separated text into [`OrderRecord`]s, and
//!   a fixed sample file can be written for self-tests.

pub mod csv;
pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `wall_core::Wall` instead of `wall_core::domain::wall::Wall`.
pub use csv::reader::{parse_orders, read_orders_from_path, split_fields, CsvError};
pub use csv::sample::{write_sample_csv, SAMPLE_CSV};
pub use domain::order::OrderRecord;
pub use domain::slot::{Slot, SlotPosition, SlotState};
pub use domain::wall::{ScanError, Wall, WallError};
