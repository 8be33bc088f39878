//! Core types for PlantNet.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod quantity;
pub mod status;

pub use email::{Email, EmailError};
pub use quantity::{QuantityChange, QuantityDirection};
pub use status::*;
