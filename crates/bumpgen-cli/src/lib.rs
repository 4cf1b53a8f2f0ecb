//! bumpgen CLI library.
//!
//! Command implementations for the `bumpgen` binary, kept in a library so
//! they can be exercised from tests.

pub mod commands;
