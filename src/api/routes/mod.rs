//! API Routes
//!
//! Route handlers organized by functionality.

pub mod geo;
pub mod health;
pub mod page;
pub mod update;
