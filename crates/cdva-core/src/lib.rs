//! cdva-core - Shared library for the `cdva-create` CLI
//!
//! This library holds everything the binary does apart from argument parsing:
//!
//! - **Settings store** (`config`) - owns the persistent JSON configuration
//!   record in the user's home folder, filling missing fields with
//!   OS-appropriate defaults.
//! - **Command layer** (`cordova`) - builds the delegated `cordova` command
//!   lines and runs them through the platform shell. The [`CommandRunner`]
//!   trait is the seam tests use to record commands instead of spawning them.
//! - **Project bootstrapper** (`project`) - orchestrates the
//!   create / platform add / plugin add sequence, aborting on the first
//!   non-zero exit code.

pub mod config;
pub mod cordova;
pub mod project;

// Re-export main types for convenience
pub use config::{AppConfig, ConfigError, HostOs};
pub use cordova::{CommandInvocation, CommandRunner, CordovaCli, ShellRunner};
pub use project::{create_project, edit_config, CreateRequest};
