//! Helpers shared by resources and filesystem operations.
pub mod fs;
