//! Statutory Calculation Engine
//!
//! This crate computes the statutory figures behind a law practice's public
//! calculators (severance pay, notice pay, alimony estimates and a family of
//! bracket-table fee calculators) from year-versioned constants, and serves
//! them over a small JSON API. Every result is advisory.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod report;
