//! PlantNet Core - Shared domain types.
//!
//! This crate provides the vocabulary used across all PlantNet components:
//! - `server` - The marketplace HTTP API
//! - `cli` - Operator tools for the document store
//!
//! # Architecture
//!
//! The core crate contains only types and pure rules - no I/O, no database
//! access, no HTTP. Store-specific representations (object ids, documents)
//! live in the server crate.
//!
//! # Modules
//!
//! - [`types`] - Emails, roles, statuses, and inventory adjustments

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
