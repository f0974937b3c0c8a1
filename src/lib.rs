pub mod config;
pub mod err;
pub mod models;
pub mod routes;
pub mod service;
pub mod store;

pub use config::Config;
pub use err::Error;
pub use routes::{router, AppState};
pub use service::StudentProfileService;
