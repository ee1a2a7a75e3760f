//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Compile vhosts → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C (or test trigger) → broadcast → Stop accepting → Drain → Exit
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
