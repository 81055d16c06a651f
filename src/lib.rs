pub mod app;
pub mod error;
pub mod models;
pub mod queue;
pub mod repository;
pub mod services;
pub mod utils;

pub use error::{BankingError, Result};
