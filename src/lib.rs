//! swaggen - typed Rust clients and servers from Swagger 2.0 documents
//!
//! The [`generation`] pipeline turns a document into a package; the
//! [`runtime`] module is what that package calls at run time.
#![deny(unsafe_code)]

pub mod application;
pub mod generation;
pub mod infrastructure;
pub mod runtime;
