//! Structured logging through `tracing`.
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → RotatingFile | stderr
//! ```
//!
//! # Configuration
//!
//! The level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `log_level` in [`Config`](crate::Config)
//! 3. Default: `"info"`
//!
//! With `log_file` set, output goes to that file and rotates at 10 MB,
//! keeping 3 timestamped backups.
//!
//! # Modules
//!
//! - [`init`]: subscriber setup
//! - [`file_writer`]: rotating file usable as a `MakeWriter`

pub mod file_writer;
pub mod init;

pub use file_writer::RotatingFile;
pub use init::init_tracing;
