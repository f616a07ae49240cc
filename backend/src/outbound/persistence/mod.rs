//! PostgreSQL store backend.
//!
//! Thin adapters over `diesel-async` and a `bb8` pool. Row structs and the
//! table definitions stay private to this module; the domain only sees the
//! repository ports.
//!
//! ```no_run
//! use hostwatch::outbound::persistence::{
//!     DbPool, DieselAccountRepository, DieselHostRepository, PoolConfig, apply_migrations,
//! };
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let url = "postgres://hostwatch@localhost/hostwatch";
//! apply_migrations(url).await?;
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let accounts = DieselAccountRepository::new(pool.clone());
//! let hosts = DieselHostRepository::new(pool);
//! # let _ = (accounts, hosts);
//! # Ok(())
//! # }
//! ```

mod diesel_account_repository;
mod diesel_host_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_host_repository::DieselHostRepository;
pub use migrations::{MigrationError, apply_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
