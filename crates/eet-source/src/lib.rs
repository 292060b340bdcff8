//! Input designators and readable stream handles.
//!
//! A designator is one command-line argument: either `-` for the process's
//! standard input or a file-system path (regular file, named pipe, device).
//! This crate turns designators into owned, pollable [`InputSource`] handles.
//! Everything else in eet builds on the handles provided here.

pub mod designator;
pub mod error;

#[cfg(unix)]
pub mod source;

pub use designator::{Designator, STDIN_TOKEN};
pub use error::{Result, SourceError};

#[cfg(unix)]
pub use source::{InputSource, SourceKind};
