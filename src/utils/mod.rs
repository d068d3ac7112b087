//! File system helpers for writing rendered output.
//!
//! # Modules
//!
//! - [`fs`] - Directory creation and atomic writes
//!
//! # Example
//!
//! ```rust,no_run
//! use envtmpl_cli::utils::{ensure_dir, atomic_write};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! ensure_dir(Path::new("/etc/app/conf.d"))?;
//! atomic_write(Path::new("/etc/app/app.conf"), b"listen 8080\n")?;
//! # Ok(())
//! # }
//! ```

pub mod fs;

pub use fs::{atomic_write, ensure_dir, remove_file_if_exists};
