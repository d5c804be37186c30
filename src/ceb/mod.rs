//! Core CEB reader module

pub mod format;
pub mod reader;
pub mod source;
pub mod types;

pub use reader::{CebReader, ReaderState};
pub use types::error::{CebError, Result};
