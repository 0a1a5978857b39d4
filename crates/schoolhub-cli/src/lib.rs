//! # SchoolHub CLI
//!
//! Operator tools that work directly on a SchoolHub data directory:
//! creating administrator accounts, seeding fake records, exporting
//! collections and taking or restoring backups.
//!
//! ## Usage
//!
//! ```ignore
//! use schoolhub_cli::seeder::{seed_all, SeedConfig};
//!
//! let store = SchoolStore::open_dir(&StorageConfig::from_env()).await?;
//! seed_all(&store, SeedConfig::new(2)).await?;
//! ```

pub mod accounts;
pub mod export;
pub mod seeder;
