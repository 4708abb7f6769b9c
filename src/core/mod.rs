// src/core/mod.rs

pub mod command_group;
pub mod manifest;
pub mod orchestrator;
pub mod paths;
pub mod quoting;
pub mod reporter;
pub mod script_set;
pub mod settings;
pub mod shell_resolver;
