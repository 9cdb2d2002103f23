//! Diffusion Core
//!
//! Core types and validation for the Diffusion image-generation client.
//!
//! This crate contains:
//! - Domain types: Job status snapshots and health snapshots
//! - DTOs: Request/response bodies exchanged with the generation backend
//! - Validation: Local checks that run before a request reaches the network

pub mod domain;
pub mod dto;
pub mod validation;
