//! # System Interaction Layer
//!
//! The boundary between the orchestration logic and the operating system.
//!
//! ## Modules
//!
//! - **`executor`**: spawns the script shell for one sub-command, wires the inherited
//!   standard streams, working directory and environment, and waits for the child
//!   while honouring the shared `CancellationToken` (`Ctrl+C`).

pub mod executor;
