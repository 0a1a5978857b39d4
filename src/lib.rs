//! # Southern Cross SchoolHub
//!
//! A school management server built with Rust and Axum. All data lives in
//! a key-value store (one JSON document per key), the role dashboards are
//! rendered on the server, and every change goes through a JSON API that
//! the pages call.
//!
//! ## Overview
//!
//! - **Accounts**: registration and login per role (admin, teacher, parent)
//!   with salted password digests and 30 minute sliding sessions
//! - **Records**: students with marks and GPA, teachers, classes, fees,
//!   announcements, homework, events, exams, library and transport
//! - **Messaging**: direct messages, replies and role-based chat groups
//! - **Data tools**: JSON export, printable tables, full backup and restore,
//!   undo and redo of data changes
//! - **Sync**: accounts and messages are shared between instances using
//!   the same data directory
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Session and role extractors
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Register, login, logout, session status
//! │   ├── students/    # Students, marks, class rosters
//! │   ├── messages/    # Direct messages and chat groups
//! │   ├── library/     # Books, materials, documents, syllabi
//! │   ├── data/        # Export, backup, restore, undo/redo, theme
//! │   ├── sections/    # Server-rendered pages
//! │   └── ...
//! ├── utils/            # HTML helpers, attachments, dates
//! └── sync.rs           # Background shared-area merge
//! ```
//!
//! Each API module follows the same layout:
//!
//! - `controller.rs`: HTTP handlers with OpenAPI annotations
//! - `service.rs`: business rules over the store
//! - `model.rs`: response types specific to the module
//! - `router.rs`: Axum router
//!
//! Records and DTOs shared with the CLI live in `schoolhub-models`; the
//! store with undo history and sync lives in `schoolhub-store`.
//!
//! ## Roles
//!
//! | Role | Can do |
//! |------|--------|
//! | Admin | Everything: records, fees, reports, backups, certificates |
//! | Teacher | Classes, attendance, marks, homework, timetable, exams |
//! | Parent | View their child, pay fees, complete homework, borrow books |
//!
//! ## Quick Start
//!
//! ```bash
//! DATA_DIR=./data
//! ADMIN_REGISTRATION_CODE=ADMIN2024
//! PORT=3000
//! ```
//!
//! Then open `http://localhost:3000/` and register. API documentation is
//! served at `/swagger-ui` and `/scalar`.

pub mod docs;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod sync;
pub mod utils;
pub mod validator;

pub use schoolhub_auth;
pub use schoolhub_config;
pub use schoolhub_core;
pub use schoolhub_models;
pub use schoolhub_store;
