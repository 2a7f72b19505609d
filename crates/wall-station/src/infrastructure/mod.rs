//! Infrastructure layer for the station.
//!
//! Contains OS-facing adapters: the terminal announcer, the stdin/stdout
//! event loop, file-system storage, and the command bridge that front ends
//! call into.
//!
//! **Dependency rule**: this layer may depend on `application` and `wall_core`,
//! but MUST NOT be imported by the `application` or domain layers.

pub mod announcer;
pub mod console;
pub mod storage;
pub mod ui_bridge;
