//! Domain layer: entities and the configuration document
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod document;
pub mod entities;
pub mod error;

pub use document::ProcessConfig;
pub use entities::*;
pub use error::DomainError;
