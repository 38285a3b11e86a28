//! Swagger 2.0 loading implementations

pub mod composite_loader;
pub mod file_loader;
pub mod http_loader;
pub mod parser;

pub use composite_loader::CompositeSwaggerLoader;
pub use file_loader::FileSwaggerLoader;
pub use http_loader::HttpSwaggerLoader;
pub use parser::SwaggerParser;
