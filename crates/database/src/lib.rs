//! # Farmstead Database Crate
//!
//! This crate is the persistence layer behind the projection service: it
//! stores each tenant's assumptions and reads back their monthly sales.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** All SQL lives here. The rest of the application talks
//!   to the `AssumptionsStore` and `SalesHistory` traits, never to a pool.
//! - **Swappable Backends:** `DbRepository` implements the traits on PostgreSQL;
//!   `InMemoryStore` implements them on a lock-guarded map for tests and
//!   database-less serving.
//! - **Asynchronous & Pooled:** All operations are asynchronous, and the
//!   PostgreSQL backend uses a connection pool (`PgPool`).
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool.
//! - `run_migrations`: Applies the embedded migrations, ensuring the schema is up-to-date.
//! - `AssumptionsStore` / `SalesHistory`: The storage seam used by the web server.
//! - `DbRepository` / `InMemoryStore`: The two implementations of that seam.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod memory;
pub mod repository;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use memory::InMemoryStore;
pub use repository::DbRepository;
pub use store::{AssumptionsStore, SalesHistory};
