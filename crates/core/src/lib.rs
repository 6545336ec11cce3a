//! Atelier Core - Shared domain types.
//!
//! This crate provides the small set of value types the storefront is built on:
//! - Type-safe identifiers for products, shoppers and checkout attempts
//! - [`Price`] with decimal arithmetic, so totals never drift
//! - [`Quantity`] and the [`QuantityUpdate`] input policy for cart lines
//! - [`CheckoutStatus`] for the simulated checkout flow
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP, no async runtime.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, quantities and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
