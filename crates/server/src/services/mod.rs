//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Session token signing, verification, and cookies

pub mod auth;
