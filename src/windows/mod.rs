//! Windows API layer for reading a target process
//!
//! Raw kernel32 bindings live here. `process::ProcessHandle` owns the
//! handles and is the sole caller of the unsafe wrappers; its unsafe
//! `Send`/`Sync` impls live with it.
//! Only read and query access is ever requested; nothing here writes to the
//! target.

pub mod bindings;

pub use bindings::kernel32;
