//! # System Interaction Layer
//!
//! The boundary between the library and the operating system.
//!
//! ## Modules
//!
//! - **`executor`**: spawns the scheduler's command-line tools. Everything above this
//!   layer talks to a [`executor::ProcessRunner`], so the real [`executor::SystemRunner`]
//!   can be swapped for a scripted fake in tests.

pub mod executor;
