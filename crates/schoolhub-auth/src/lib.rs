//! # SchoolHub Auth
//!
//! Session handling for the SchoolHub server.
//!
//! Signing in trades a role, username and password for an opaque session
//! token. The token is kept in an in-memory [`SessionStore`] and expires
//! after a period of inactivity (30 minutes by default), with a warning
//! window before it lapses.
//!
//! - [`session`]: the [`Session`] record and the [`SessionStore`]
//! - [`token`]: random token generation
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_auth::SessionStore;
//! use chrono::Duration;
//!
//! let sessions = SessionStore::new(Duration::minutes(30), Duration::minutes(5));
//! let session = sessions.create(&user);
//! assert!(sessions.resolve(&session.token).is_some());
//! ```

pub mod session;
pub mod token;

pub use session::{Session, SessionStatus, SessionStore};
pub use token::generate_session_token;
