//! CLI command implementations

pub mod analyze;
pub mod compare;
pub mod optimize;
pub mod settings;
pub mod template;
