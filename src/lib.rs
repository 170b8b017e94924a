// Library for the binary and for tests

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod probe;
pub mod store;
pub mod window;

pub use error::{Error, Result};
