//! Core business logic for Facturo.
//!
//! This crate contains pure business logic with ZERO database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `validation` - Field format checks and display formatters
//! - `client` - Client identity rules
//! - `numbering` - Year-scoped document numbers
//! - `billing` - Line totals, invoice balance and status machines

pub mod billing;
pub mod client;
pub mod numbering;
pub mod validation;
