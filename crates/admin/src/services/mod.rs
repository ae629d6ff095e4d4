//! External service clients that are not the commerce API.

pub mod identity;
