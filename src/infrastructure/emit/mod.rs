//! Tera-based emitters for the generated Rust package

pub mod emitters;
pub mod renderer;

pub use emitters::{TemplateEmitter, rust_emitters};
pub use renderer::TeraRenderer;
