//! # SchoolHub Store
//!
//! The persistent data store behind the SchoolHub server and CLI.
//!
//! - [`store`]: [`SchoolStore`], the single mutation entry point, undo
//!   history, backup and restore
//! - [`state`]: [`SchoolState`], everything the store persists
//! - [`sync`]: the shared-copy merge run at startup and by the sync worker
//! - [`keys`]: storage key names
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_store::{SchoolStore, StoreError};
//!
//! let store = SchoolStore::open_dir(&config.storage).await?;
//! store
//!     .mutate(|tx| {
//!         tx.data.classes.push("12C".to_string());
//!         tx.audit("admin", "class_added", "Added class 12C");
//!         Ok::<_, StoreError>(())
//!     })
//!     .await?;
//! ```

pub mod error;
pub mod keys;
pub mod state;
pub mod store;
pub mod sync;

pub use error::StoreError;
pub use state::{Mutation, SchoolState};
pub use store::SchoolStore;
pub use sync::{SharedSnapshot, SyncReport, merge_messages, merge_users};
