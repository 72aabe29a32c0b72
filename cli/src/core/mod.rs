//! # execrs Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates the core infrastructure shared by the process
//! runner and the CLI front end:
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and the application `Result` alias
//!
//! ## Usage
//!
//! ```rust
//! use execrs::core::config; // For loading configuration
//! use execrs::core::error::{ExecrsError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
