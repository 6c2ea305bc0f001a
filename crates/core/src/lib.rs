//! Lotus Core - Shared types library.
//!
//! This crate provides common types used across all Lotus components:
//! - `storefront` - Client library for the remote storefront backend
//! - `cli` - Command-line shopping interface
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and
//!   order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
