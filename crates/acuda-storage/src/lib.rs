//! Acuda Storage Library
//!
//! Per-user document folders on the local filesystem.
//!
//! # Layout
//!
//! Every account owns one folder, `{storage_root}/{ruta}`. Generated reports are written there
//! and listed, viewed or downloaded from there. A `ruta` must be relative and must not contain
//! `..`; requested file names are resolved against the user's folder and refused when they
//! escape it, lexically or through symlinks.

pub mod keys;
pub mod listing;
pub mod local;
pub mod mime;
pub(crate) mod paths;
pub mod traits;

// Re-export commonly used types
pub use keys::report_file_name;
pub use local::LocalFileStore;
pub use paths::is_safe_relative;
pub use traits::{ByteStream, FileStore, StorageError, StorageResult, StoredFile, StoredReport};
