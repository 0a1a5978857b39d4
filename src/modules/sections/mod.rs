//! Server-rendered pages: sign-in, registration, the role dashboards and
//! the printable views.

pub mod admin;
pub mod controller;
pub mod pages;
pub mod parent;
pub mod router;
pub mod service;
pub mod shared;
pub mod teacher;

pub use router::init_sections_router;
