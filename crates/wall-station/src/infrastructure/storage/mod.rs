//! Storage infrastructure: configuration file persistence.
//!
//! This module provides a thin adapter between the application and the
//! file system.  The `config` sub-module handles:
//!
//! - Reading the TOML configuration file from the platform-appropriate
//!   directory, or from an explicit `--config` path.
//! - Writing a default file when the operator runs `config init`.
//! - Providing sensible defaults when the file does not exist yet (first run).
//!
//! Order files are not handled here; reading and writing CSV is part of
//! `wall-core`.

pub mod config;
