//! File system utilities for rendered output
//!
//! Outputs are written atomically so that a service reading its configuration
//! never sees a half-rendered file, and a failed render leaves the previous
//! file in place.

pub mod atomic;
pub mod dirs;

// Directory operations
pub use dirs::{ensure_dir, remove_file_if_exists};

// Atomic write operations
pub use atomic::atomic_write;
