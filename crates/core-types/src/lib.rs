//! # Farmstead Core Types
//!
//! The shared vocabulary of the workspace: the financial assumptions a tenant
//! configures, the monthly sales aggregates the projection baseline is derived
//! from, and the tenant identifier every request is scoped to.
//!
//! This is a Layer 0 crate. It depends on no other crate in the workspace.

pub mod decimal_wire;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use structs::{Assumptions, MonthlySales, TenantId, MAX_GROWTH_RATE, MIN_GROWTH_RATE, MIN_PRICE};
