// src/input/mod.rs

//! Input resolution: which of the pipeline's files are hives, and where they
//! live.
//!
//! - [`descriptor`] models the accepted input shapes.
//! - [`resolver`] selects hives and derives path, display name and working
//!   directory.
//! - [`pipe`] unpacks input files handed over by a previous task.

pub mod descriptor;
pub mod pipe;
pub mod resolver;

pub use descriptor::{FileHandle, InputDescriptor};
pub use pipe::get_input_files;
pub use resolver::{ResolvedInput, display_name, resolve, resolve_path, select, working_dir};
