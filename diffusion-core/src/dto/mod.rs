//! Data Transfer Objects for the backend REST contract
//!
//! Field names follow the backend's wire format, which is why some of
//! them are renamed on the Rust side.

pub mod generation;
pub mod health;
