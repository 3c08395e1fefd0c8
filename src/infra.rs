//! Seams between the pipeline and the process environment.
//!
//! Subprocess execution and lockfile probing sit behind traits so the build
//! and collect steps can be exercised in tests without spawning real
//! commands or touching a real working directory.

use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Output};
use tokio::process::Command;

/// Runs external commands for the pipeline.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command with inherited stdio and wait for its exit status.
    async fn status(&self, program: &str, args: &[String]) -> io::Result<ExitStatus>;

    /// Run a command and capture its output.
    async fn output(&self, program: &str, args: &[String]) -> io::Result<Output>;
}

/// Command runner backed by real subprocesses.
#[derive(Debug, Clone, Copy)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn status(&self, program: &str, args: &[String]) -> io::Result<ExitStatus> {
        Command::new(program).args(args).status().await
    }

    async fn output(&self, program: &str, args: &[String]) -> io::Result<Output> {
        Command::new(program).args(args).output().await
    }
}

/// Answers "does this file exist in the workspace?" for build auto-detection.
pub trait FileProbe {
    fn exists(&self, file_name: &str) -> bool;
}

/// File probe rooted at a real directory.
#[derive(Debug, Clone)]
pub struct DirProbe {
    root: PathBuf,
}

impl DirProbe {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirProbe { root: root.into() }
    }

    /// Probe rooted at the process working directory, where CI checks out
    /// the repository.
    pub fn current_dir() -> io::Result<Self> {
        Ok(DirProbe::new(std::env::current_dir()?))
    }
}

impl FileProbe for DirProbe {
    fn exists(&self, file_name: &str) -> bool {
        self.root.join(file_name).exists()
    }
}

/// Build an ExitStatus with the given exit code for test doubles, without
/// spawning a process.
#[cfg(all(test, unix))]
pub(crate) fn mock_exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8) // Unix keeps the exit code in the upper bits
}

#[cfg(all(test, windows))]
pub(crate) fn mock_exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(code as u32)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Command runner that records every invocation and replays scripted
    /// exit codes and captured output.
    pub struct ScriptedRunner {
        pub calls: Mutex<Vec<String>>,
        exit_codes: Mutex<VecDeque<i32>>,
        stdout: Vec<u8>,
    }

    impl ScriptedRunner {
        /// Runner whose every command succeeds with empty output.
        pub fn succeeding() -> Self {
            ScriptedRunner {
                calls: Mutex::new(Vec::new()),
                exit_codes: Mutex::new(VecDeque::new()),
                stdout: Vec::new(),
            }
        }

        /// Runner that returns the given exit codes in order, then zero.
        pub fn with_exit_codes(codes: &[i32]) -> Self {
            ScriptedRunner {
                calls: Mutex::new(Vec::new()),
                exit_codes: Mutex::new(codes.iter().copied().collect()),
                stdout: Vec::new(),
            }
        }

        /// Runner whose captured commands succeed and print `stdout`.
        pub fn with_stdout(stdout: &str) -> Self {
            ScriptedRunner {
                calls: Mutex::new(Vec::new()),
                exit_codes: Mutex::new(VecDeque::new()),
                stdout: stdout.as_bytes().to_vec(),
            }
        }

        pub fn recorded_calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, program: &str, args: &[String]) -> i32 {
            let mut rendered = program.to_string();
            for arg in args {
                rendered.push(' ');
                rendered.push_str(arg);
            }
            self.calls.lock().unwrap().push(rendered);
            self.exit_codes.lock().unwrap().pop_front().unwrap_or(0)
        }
    }

    #[async_trait]
    impl CommandRunner for ScriptedRunner {
        async fn status(&self, program: &str, args: &[String]) -> io::Result<ExitStatus> {
            Ok(mock_exit_status(self.record(program, args)))
        }

        async fn output(&self, program: &str, args: &[String]) -> io::Result<Output> {
            let code = self.record(program, args);
            Ok(Output {
                status: mock_exit_status(code),
                stdout: self.stdout.clone(),
                stderr: Vec::new(),
            })
        }
    }

    /// File probe over a fixed set of file names.
    pub struct FixedProbe {
        present: Vec<&'static str>,
    }

    impl FixedProbe {
        pub fn containing(present: &[&'static str]) -> Self {
            FixedProbe { present: present.to_vec() }
        }
    }

    impl FileProbe for FixedProbe {
        fn exists(&self, file_name: &str) -> bool {
            self.present.contains(&file_name)
        }
    }
}
