//! # dbforge
//!
//! A schema-migration engine for relational databases: a builder-style DDL
//! description, deterministic SQL rendering with MD5 fingerprinting, and a
//! crash-safe migration runner backed by a per-namespace bookkeeping
//! table.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dbforge::adapters::RusqliteConnection;
//! use dbforge::migration::{Migration, Migrator};
//! use dbforge::options::MigrateOptions;
//! use dbforge::runner::Runner;
//!
//! # fn main() -> dbforge::error::Result<()> {
//! let mut migrator = Migrator::new();
//! migrator.add(Migration::new(
//!     1,
//!     |schema| {
//!         schema.create("widgets", |t| {
//!             t.primary("id").autoincrement();
//!             t.string("name");
//!         });
//!     },
//!     |schema| schema.drop("widgets"),
//! ));
//!
//! let mut conn = RusqliteConnection::open_in_memory()?;
//! let mut runner = Runner::new(&mut conn, MigrateOptions::default());
//! runner.up_to(&migrator, "default", 1)?;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod bookkeeping;
pub mod dialect;
pub mod error;
pub mod migration;
pub mod options;
pub mod runner;
pub mod schema;
