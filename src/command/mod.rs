// src/command/mod.rs

//! Command construction for the external tool.
//!
//! - [`flags`] maps the task config (and env overrides) to optional flags.
//! - [`builder`] assembles the full argument vector and the execution record.

pub mod builder;
pub mod flags;

pub use builder::{ExecutionRecord, build_command};
pub use flags::{EnvSource, ProcessEnv, TaskConfig, build_flags};
