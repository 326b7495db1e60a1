// src/core/mod.rs

pub mod escalation;
pub mod formatter;
pub mod option_store;
pub mod script;
pub mod vocabulary;
