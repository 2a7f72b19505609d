//! Application layer use cases for the station.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure business rules in `wall-core`) and the infrastructure (files,
//! terminals, timers' consumers).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil an operator goal (e.g., "tell me
//!   where this parcel goes and clear it from the wall").
//! - **Depend on abstractions** (traits) rather than concrete implementations,
//!   so the announcement output can be swapped without changing this code.
//!
//! # Sub-modules
//!
//! - **`import_orders`** – Reads an order file and replaces the wall contents
//!   with an even distribution of its orders.
//!
//! - **`confirm_scan`** – Resolves a scanned code to a slot, highlights and
//!   announces it, and schedules the delayed removal of the picked order.

pub mod confirm_scan;
pub mod import_orders;
