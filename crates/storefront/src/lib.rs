//! Lotus storefront client library.
//!
//! This crate is the programmatic half of the storefront: everything the
//! interactive surface (the CLI) does goes through the services here. State
//! lives on the remote backend; the client keeps only the persisted session
//! identity and a short-lived catalog cache.
//!
//! # Architecture
//!
//! - [`api`] - typed REST client for the backend (reqwest + moka)
//! - [`session`] - persisted identity and bearer credential
//! - [`cart`] - the cart aggregate and its mutate-then-reload protocol
//! - [`checkout`] - the one-shot cart-to-order transition
//! - [`orders`] - order submission and history
//!
//! The backend is authoritative for stock, line merging, and order totals.
//! After every cart mutation the client re-fetches the full cart instead of
//! trusting a local delta, so client and server state cannot drift.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod orders;
pub mod session;
pub mod state;

pub use error::StoreError;
