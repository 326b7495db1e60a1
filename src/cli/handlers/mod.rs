// src/cli/handlers/mod.rs

// One module per CLI action.

pub mod acct;
pub mod cancel;
pub mod commons;
pub mod queue;
pub mod run;
pub mod show;
pub mod signal;
pub mod submit;
