//! Application services

pub mod bootstrap;

pub use bootstrap::{Bootstrapped, ConfigResolver};
