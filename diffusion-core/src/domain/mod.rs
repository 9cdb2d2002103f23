//! Core domain types
//!
//! These types describe what the client knows about the backend: the
//! last observed status of a generation job and the last liveness check.
//! Both are read-only snapshots; only the backend mutates a job.

pub mod health;
pub mod job;
