//! # nrun
//!
//! Runs the named scripts a project declares in its manifest, one after another,
//! through the platform's script shell (`sh` or `cmd.exe`/`COMSPEC`).

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;

/// The cancellation signal shared by one invocation.
///
/// Fired by Ctrl+C in the binary. Every child-process wait selects on
/// `cancelled()`, and the orchestrator checks `is_cancelled()` before starting
/// anything new.
pub type CancellationToken = tokio_util::sync::CancellationToken;
