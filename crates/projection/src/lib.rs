//! # Farmstead Projection Engine
//!
//! Answers "when does this operation break even?" for a tenant's pricing and
//! cost assumptions.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of the
//!   database or the web server. It depends only on `core-types` and
//!   `configuration`.
//! - **Stateless Calculation:** The `ProjectionEngine` takes assumptions and a
//!   month-1 unit volume and produces `BreakEvenMetrics`. Identical inputs give
//!   identical output; "today" is an argument, never read from the clock.
//! - **Decimal Arithmetic:** Every money and volume figure is a `Decimal`,
//!   returned at full precision. Rounding is left to presentation.
//!
//! ## Public API
//!
//! - `ProjectionEngine`: contribution margin, monthly simulation, break-even scan.
//! - `BreakEvenMetrics` / `MonthlyProjection`: the engine's output.
//! - `baseline::trailing_average_units`: month-1 volume from sales history.
//! - `export::projections_to_csv`: the monthly table as CSV.
//! - `ProjectionError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod baseline;
pub mod engine;
pub mod error;
pub mod export;
pub mod metrics;

// Re-export the key components to create a clean, public-facing API.
pub use baseline::trailing_average_units;
pub use engine::ProjectionEngine;
pub use error::ProjectionError;
pub use export::{projections_to_csv, write_projections_csv};
pub use metrics::{BreakEvenMetrics, MonthlyProjection};
