//! Attaching to a live target process on Windows

pub mod handle;

pub use handle::{ProcessHandle, READ_ACCESS};
