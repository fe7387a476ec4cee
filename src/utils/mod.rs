//! Utility modules for the MatriWeb API.
//!
//! - [`errors`]: Application error types and handling
//! - [`password`]: Password hashing and verification

pub mod errors;
pub mod password;
