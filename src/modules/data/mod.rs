pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use router::{init_admin_data_router, init_data_router};
