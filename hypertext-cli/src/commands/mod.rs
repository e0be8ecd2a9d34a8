//! CLI command implementations.

pub mod build;
pub mod init;
pub mod serve;

pub use build::build_site;
pub use init::init_project;
pub use serve::serve_site;
