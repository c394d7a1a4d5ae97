//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod context;
pub mod error;
pub mod services;

pub use context::AppContext;
pub use error::{ApplicationError, ApplicationResult};
