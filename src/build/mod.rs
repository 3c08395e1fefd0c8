use crate::infra::{CommandRunner, FileProbe};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Command `{command}` exited with status {code}")]
    CommandFailed { command: String, code: i32 },

    #[error("Failed to spawn command: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Build command is empty")]
    EmptyCommand,
}

/// How the assets get built, from the workflow's `build-command` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildCommand {
    /// `"auto"`: detect the package manager from its lockfile and run a
    /// deterministic install followed by the production build script.
    Auto,
    /// `"false"`: the workflow already built the assets, do nothing.
    Skip,
    /// Anything else: run it as-is. Split on whitespace into program and
    /// arguments, no shell involved.
    Custom(String),
}

impl BuildCommand {
    pub fn parse(value: &str) -> BuildCommand {
        match value {
            "auto" => BuildCommand::Auto,
            "false" => BuildCommand::Skip,
            other => BuildCommand::Custom(other.to_string()),
        }
    }
}

/// One planned subprocess invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: &str, args: &[&str]) -> CommandLine {
        CommandLine {
            program: program.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    /// Split a command string into program + arguments. None when the
    /// string holds nothing to run.
    pub fn split(command: &str) -> Option<CommandLine> {
        let mut parts = command.split_whitespace();
        let program = parts.next()?.to_string();
        Some(CommandLine {
            program,
            args: parts.map(str::to_string).collect(),
        })
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// The two commands auto-detection runs for the detected package manager.
pub fn plan_auto_build(has_yarn_lockfile: bool) -> Vec<CommandLine> {
    if has_yarn_lockfile {
        vec![
            CommandLine::new("yarn", &["--frozen-lockfile"]),
            CommandLine::new("yarn", &["run", "prod"]),
        ]
    } else {
        vec![
            CommandLine::new("npm", &["ci"]),
            CommandLine::new("npm", &["run", "prod"]),
        ]
    }
}

/// Resolve a build command into the subprocess invocations to run.
pub fn plan_build(
    command: &BuildCommand,
    probe: &dyn FileProbe,
) -> Result<Vec<CommandLine>, BuildError> {
    match command {
        BuildCommand::Auto => Ok(plan_auto_build(probe.exists("yarn.lock"))),
        BuildCommand::Skip => Ok(Vec::new()),
        BuildCommand::Custom(raw) => {
            let line = CommandLine::split(raw).ok_or(BuildError::EmptyCommand)?;
            Ok(vec![line])
        }
    }
}

/// Build the assets for the current checkout. Any nonzero exit aborts the
/// run; there is no retry.
pub async fn build_assets(
    command: &BuildCommand,
    probe: &dyn FileProbe,
    runner: &dyn CommandRunner,
) -> Result<(), BuildError> {
    let plan = plan_build(command, probe)?;
    if plan.is_empty() {
        debug!("asset build skipped");
        return Ok(());
    }
    for step in &plan {
        info!(command = %step, "running build step");
        run_step(runner, step).await?;
    }
    Ok(())
}

/// Switch the workspace to another commit between the two builds.
pub async fn checkout_git_ref(
    git_ref: &str,
    runner: &dyn CommandRunner,
) -> Result<(), BuildError> {
    let step = CommandLine::new("git", &["checkout", git_ref]);
    info!(command = %step, "checking out base revision");
    run_step(runner, &step).await
}

async fn run_step(runner: &dyn CommandRunner, step: &CommandLine) -> Result<(), BuildError> {
    let status = runner.status(&step.program, &step.args).await?;
    if !status.success() {
        return Err(BuildError::CommandFailed {
            command: step.to_string(),
            code: status.code().unwrap_or(-1),
        });
    }
    Ok(())
}
