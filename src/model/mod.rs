pub mod config;
pub mod study;
pub mod validation;

pub use config::{Config, LlmConfig};
pub use study::*;
pub use validation::*;
