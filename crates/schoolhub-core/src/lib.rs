//! # SchoolHub Core
//!
//! Foundational types shared by every SchoolHub crate:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: Salted password digests and strength rules
//! - [`kv`]: String key-value storage backends (file and in-memory)
//! - [`ids`]: Millisecond-timestamp record id generation
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_core::errors::AppError;
//! use schoolhub_core::password::{hash_password, verify_password};
//!
//! let digest = hash_password("Secret123");
//! assert!(verify_password("Secret123", &digest));
//!
//! let error = AppError::not_found(anyhow::anyhow!("Student not found"));
//! ```

pub mod errors;
pub mod ids;
pub mod kv;
pub mod password;

pub use errors::{AppError, ErrorResponse};
pub use ids::{IdGenerator, RecordId};
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, StorageError};
pub use password::{check_password_strength, hash_password, is_password_digest, verify_password};
