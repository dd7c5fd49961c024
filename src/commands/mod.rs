//! Subcommand handlers: argument validation, path resolution, and the
//! glue between the CLI and the library operations.

pub mod compress;
pub mod merge;
pub mod split;
pub mod unlock;
