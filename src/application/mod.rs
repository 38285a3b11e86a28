//! Application layer - use cases on top of the generation domain

pub mod check;
pub mod config;
pub mod dto;
pub mod errors;
pub mod generate;
pub mod traits;

pub use check::*;
pub use config::*;
pub use dto::*;
pub use errors::*;
pub use generate::*;
pub use traits::*;
