//! services/api/src/lib.rs
//!
//! HTTP surface and infrastructure adapters for the professor directory.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
