//! Brightbasket Core - Shared types library.
//!
//! This crate provides common types used across all Brightbasket components:
//! - `storefront` - Public-facing e-commerce site
//! - `admin` - Internal administration panel
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no session
//! handling. Everything here is either wire-shaped data received from the
//! external commerce API or pure client-side state (the cart store). This
//! keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Cart store, order status tables, catalog models, typed IDs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
