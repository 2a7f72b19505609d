//! Order file reading and the sample fixture.
//!
//! - **`reader`** – line splitting, the quote-aware field splitter, and the
//!   positional mapping of fields onto [`OrderRecord`](crate::OrderRecord)s.
//! - **`sample`** – the fixed twelve-order reference file used for self-tests.

pub mod reader;
pub mod sample;
