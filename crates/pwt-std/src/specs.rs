//! Specifications of work performed outside of the build process

pub mod exec_spec;
pub mod java_spec;
