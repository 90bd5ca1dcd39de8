pub mod config;
pub mod error;
pub mod estimator;
pub mod llm;
pub mod predictor;
pub mod reference;
pub mod server;

pub use error::{Error, Result};
