//! Shared types for the EPOS back office
//!
//! Common types used by the server and its clients: domain models,
//! the error system, account DTOs and id/time utilities.

pub mod client;
pub mod error;
pub mod models;
pub mod util;
