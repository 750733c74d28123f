//! nodediag core library
//!
//! This library provides the building blocks behind `ndctl`:
//! - Diagnostic bundle collection, gated per target platform at build time
//! - Bundle configuration loading
//! - Structured logging setup
//! - Exit codes for CLI operations
//!
//! The binary entry point is in `main.rs`.

pub mod config;
pub mod debug_bundle;
pub mod exit_codes;
pub mod logging;
