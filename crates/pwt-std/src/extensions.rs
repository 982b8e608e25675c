//! Extensions to types defined in pwt-core

pub mod project_extensions;
