//! Outbound adapters implementing the repository ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **document**: MongoDB repositories (feature `mongo`)
//! - **memory**: in-process repositories for development and tests
//!
//! Adapters translate between domain types and storage representations and
//! enforce the uniqueness rules at the storage level. They contain no
//! registration logic.

#[cfg(feature = "mongo")]
pub mod document;
pub mod memory;
pub mod persistence;
