//! Building and running delegated `cordova` commands
//!
//! Commands go through the platform shell (`cmd /C` on Windows, `sh -c`
//! elsewhere) because the configured `createParms` string is appended to the
//! command line verbatim. Execution is fully synchronous; a hung subprocess
//! hangs the tool.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// One delegated subprocess call
///
/// Commands issued after `cordova create` carry the new project folder as
/// their working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub command_line: String,
    pub working_dir: Option<PathBuf>,
}

impl CommandInvocation {
    pub fn new(command_line: impl Into<String>) -> Self {
        Self {
            command_line: command_line.into(),
            working_dir: None,
        }
    }

    pub fn in_dir(command_line: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            command_line: command_line.into(),
            working_dir: Some(dir.into()),
        }
    }
}

/// Seam between the bootstrapper and the host shell
///
/// The real implementation is [`ShellRunner`]; tests substitute a recording
/// runner so command sequences can be asserted without spawning anything.
pub trait CommandRunner {
    /// Run the command and return its exit code
    fn run(&mut self, invocation: &CommandInvocation) -> Result<i32>;
}

/// Runs commands through the platform shell, blocking until they finish
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&mut self, invocation: &CommandInvocation) -> Result<i32> {
        let mut command = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&invocation.command_line);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&invocation.command_line);
            c
        };
        if let Some(dir) = &invocation.working_dir {
            command.current_dir(dir);
        }

        let status = command
            .status()
            .with_context(|| format!("Failed to execute: {}", invocation.command_line))?;
        // Killed-by-signal has no code; treat it as a failure
        Ok(status.code().unwrap_or(-1))
    }
}

/// Builds `cordova` command lines, honoring the configured debug flag
#[derive(Debug, Clone, Copy)]
pub struct CordovaCli {
    enable_debug: bool,
}

impl CordovaCli {
    pub fn new(enable_debug: bool) -> Self {
        Self { enable_debug }
    }

    pub fn enable_debug(&self) -> bool {
        self.enable_debug
    }

    /// Full command line for a cordova subcommand, e.g. `platform add ios`
    pub fn command_line(&self, args: &str) -> String {
        if self.enable_debug {
            format!("cordova -d {}", args)
        } else {
            format!("cordova {}", args)
        }
    }

    pub fn invocation(&self, args: &str, dir: Option<&Path>) -> CommandInvocation {
        match dir {
            Some(dir) => CommandInvocation::in_dir(self.command_line(args), dir),
            None => CommandInvocation::new(self.command_line(args)),
        }
    }
}
