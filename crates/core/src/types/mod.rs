//! Core types for Brightbasket.
//!
//! This module provides the cart state container and the wire-shaped models
//! exchanged with the external commerce API.

pub mod address;
pub mod cart;
pub mod catalog;
pub mod email;
pub mod id;
pub mod order;
pub mod status;

pub use address::ShippingAddress;
pub use cart::{Cart, CartLine, LineItem};
pub use catalog::{ApiEnvelope, Category, Product};
pub use email::{Email, EmailError};
pub use id::*;
pub use order::{Order, OrderItem};
pub use status::OrderStatus;
