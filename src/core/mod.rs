pub mod config;
pub mod error;

pub use config::{EngineConfig, FiringOrder, DEFAULT_MAX_ROUNDS};
pub use error::{Result, SimError};
