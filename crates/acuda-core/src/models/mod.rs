//! Data models for the application
//!
//! Report and document records, uploaded images, accounts and folder listings.

mod document;
mod file;
mod image;
mod report;
mod user;

pub use document::*;
pub use file::*;
pub use image::*;
pub use report::*;
pub use user::*;
