//! # runprep Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational components shared by the library and the command handlers.
//!
//! ## Architecture
//!
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and error handling utilities
//! - `manifest`: Run manifests consumed by `runprep prepare`
//!
//! ## Usage
//!
//! ```rust
//! use runprep::core::config; // For loading configuration
//! use runprep::core::error::{RunprepError, Result}; // For error handling
//! use runprep::core::manifest::Manifest; // For run manifests
//! ```
//!
pub mod config;
pub mod error;
pub mod manifest;
