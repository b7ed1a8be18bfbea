//! # System
//!
//! Operating system detection and command execution.
//!
//! ## Responsibility
//! - Detect the OS family and pick the matching [`Platform`]
//! - Build one native [`FileSystem`] per [`System`], on first use
//! - Run single shell commands through a [`CommandRunner`]

use std::fmt;
use std::process::Command;
use std::sync::{Arc, OnceLock};

use crate::{FileSystem, FsError, NativeFs, Platform};

/// Exit code a shell reports for an unknown command.
const COMMAND_NOT_FOUND: i32 = 127;

/// Operating system family.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OsFamily {
    /// Linux, macOS, the BSDs and other Unix-like systems.
    Unix,
    /// Microsoft Windows.
    Windows,
    /// Any other system, by name.
    Other(String),
}

impl OsFamily {
    /// The family of the running system.
    pub fn current() -> Self {
        Self::from_name(std::env::consts::OS)
    }

    /// Classify an operating system name, case-insensitively.
    ///
    /// ```rust
    /// use syspath::OsFamily;
    ///
    /// assert_eq!(OsFamily::from_name("Darwin"), OsFamily::Unix);
    /// assert_eq!(OsFamily::from_name("WINNT"), OsFamily::Windows);
    /// assert_eq!(OsFamily::from_name("plan9"), OsFamily::Other("plan9".into()));
    /// ```
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "linux" | "unix" | "darwin" | "macos" | "ios" | "android" | "freebsd" | "openbsd"
            | "netbsd" | "dragonfly" | "solaris" | "illumos" => OsFamily::Unix,
            "windows" | "win32" | "winnt" => OsFamily::Windows,
            _ => OsFamily::Other(name.to_string()),
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsFamily::Unix => f.write_str("unix"),
            OsFamily::Windows => f.write_str("windows"),
            OsFamily::Other(name) => f.write_str(name),
        }
    }
}

/// Standard output and exit code of a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output, split into lines.
    pub lines: Vec<String>,
    /// Exit code; `-1` when the process was terminated by a signal.
    pub code: i32,
}

/// Executes a command string.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn CommandRunner`.
pub trait CommandRunner: Send + Sync {
    /// Run `command` and wait for it to finish.
    ///
    /// A non-zero exit code is not an error.
    fn run(&self, command: &str) -> Result<CommandOutput, FsError>;
}

/// Runs commands through `sh -c`, or `cmd /C` on Windows.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str) -> Result<CommandOutput, FsError> {
        let mut shell = if cfg!(windows) {
            let mut shell = Command::new("cmd");
            shell.arg("/C");
            shell
        } else {
            let mut shell = Command::new("sh");
            shell.arg("-c");
            shell
        };

        let output = shell
            .arg(command)
            .output()
            .map_err(|e| FsError::from_io("execute", command, e))?;

        Ok(CommandOutput {
            lines: String::from_utf8_lossy(&output.stdout)
                .lines()
                .map(String::from)
                .collect(),
            code: output.status.code().unwrap_or(-1),
        })
    }
}

/// Entry point to the host system.
///
/// The platform is chosen from the OS family; the file system is created on
/// the first call to [`file_system`](Self::file_system) and shared afterwards.
///
/// # Example
///
/// ```rust
/// use syspath::{OsFamily, Platform, System};
///
/// let system = System::with_os_family(OsFamily::Windows);
/// assert_eq!(system.platform()?, Platform::Windows);
/// assert!(System::with_os_family(OsFamily::Other("plan9".into())).platform().is_err());
/// # Ok::<(), syspath::FsError>(())
/// ```
pub struct System {
    os: OsFamily,
    file_system: OnceLock<Arc<FileSystem>>,
    runner: Box<dyn CommandRunner>,
}

impl System {
    /// Probe the running system.
    pub fn new() -> Self {
        Self::with_os_family(OsFamily::current())
    }

    /// Treat the host as `os`.
    pub fn with_os_family(os: OsFamily) -> Self {
        Self {
            os,
            file_system: OnceLock::new(),
            runner: Box::new(ShellRunner),
        }
    }

    /// Execute commands through `runner`.
    pub fn with_runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    /// The detected OS family.
    pub fn os_family(&self) -> &OsFamily {
        &self.os
    }

    /// Check whether the host is a Unix-like system.
    pub fn is_unix(&self) -> bool {
        self.os == OsFamily::Unix
    }

    /// Check whether the host is Windows.
    pub fn is_windows(&self) -> bool {
        self.os == OsFamily::Windows
    }

    /// Path rules of the host.
    ///
    /// # Errors
    ///
    /// - [`FsError::UnsupportedPlatform`] for an OS family without path rules
    pub fn platform(&self) -> Result<Platform, FsError> {
        match &self.os {
            OsFamily::Unix => Ok(Platform::Posix),
            OsFamily::Windows => Ok(Platform::Windows),
            OsFamily::Other(name) => Err(FsError::UnsupportedPlatform { os: name.clone() }),
        }
    }

    /// The native file system of the host.
    ///
    /// # Errors
    ///
    /// - [`FsError::UnsupportedPlatform`] for an OS family without path rules
    pub fn file_system(&self) -> Result<&Arc<FileSystem>, FsError> {
        if let Some(fs) = self.file_system.get() {
            return Ok(fs);
        }

        let platform = self.platform()?;
        Ok(self.file_system.get_or_init(|| {
            log::debug!("creating {} file system", platform.name());
            Arc::new(FileSystem::new(platform, Arc::new(NativeFs::new())))
        }))
    }

    /// Name of the user running the process, from `USER` or `LOGNAME`.
    pub fn client(&self) -> String {
        std::env::var("USER")
            .or_else(|_| std::env::var("LOGNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }

    /// Execute a single command.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidCommand`] if `command` is empty
    /// - [`FsError::CommandNotFound`] if the shell does not know the command
    pub fn execute(&self, command: &str) -> Result<CommandOutput, FsError> {
        if command.trim().is_empty() {
            return Err(FsError::InvalidCommand);
        }

        log::debug!("executing {command}");
        let output = self.runner.run(command)?;
        if output.code == COMMAND_NOT_FOUND {
            return Err(FsError::CommandNotFound {
                command: command.to_string(),
            });
        }

        log::trace!("{command} exited with {}", output.code);
        Ok(output)
    }
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("System")
            .field("os", &self.os)
            .field("file_system", &self.file_system.get())
            .finish_non_exhaustive()
    }
}
