//! Generation domain module - turns a Swagger 2.0 document into a typed package
//!
//! The workflow runs in fixed stages: a [`SwaggerLoader`] produces an
//! [`ApiDocument`], the [`SpecWalker`] normalizes it into ordered
//! [`OperationDescriptor`]s using the [`TypeMapper`], the
//! [`OperationCompiler`] turns each descriptor into the pieces of generated
//! source, and the [`Emitter`]s render those into artifacts. Any
//! [`SpecError`] along the way aborts the run.

pub mod compiler;
pub mod context;
pub mod errors;
pub mod orchestrator;
pub mod sanitizers;
pub mod traits;
pub mod type_mapper;
pub mod types;
pub mod utils;
pub mod walker;

pub use compiler::*;
pub use context::*;
pub use errors::*;
pub use orchestrator::*;
pub use traits::*;
pub use type_mapper::*;
pub use types::*;
pub use walker::*;
