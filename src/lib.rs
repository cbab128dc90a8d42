pub mod chat;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod ops;
pub mod payment;
pub mod persist;
pub mod seed;
pub mod store;
pub mod upload;

pub use error::{AppError, AppResult};
pub use store::AppState;
