use crate::build::CommandLine;
use crate::fingerprint::Fingerprint;
use crate::infra::CommandRunner;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("Size reporter exited with status {code}")]
    ReporterFailed { code: i32 },

    #[error("Failed to spawn size reporter: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Failed to parse size reporter output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Size reporter command is empty")]
    EmptyCommand,
}

/// Measure the built assets matching `patterns`.
///
/// Runs the configured reporter command with `--json` and the glob patterns
/// passed through verbatim, then parses its stdout as a single JSON payload
/// mapping file path to raw/gzip sizes. Malformed output is fatal.
pub async fn collect_asset_sizes(
    reporter_command: &str,
    patterns: &[String],
    runner: &dyn CommandRunner,
) -> Result<Fingerprint, CollectError> {
    let mut command =
        CommandLine::split(reporter_command).ok_or(CollectError::EmptyCommand)?;
    command.args.push("--json".to_string());
    command.args.extend(patterns.iter().cloned());

    debug!(command = %command, "measuring asset sizes");
    let output = runner.output(&command.program, &command.args).await?;
    if !output.status.success() {
        return Err(CollectError::ReporterFailed {
            code: output.status.code().unwrap_or(-1),
        });
    }

    let payload = String::from_utf8_lossy(&output.stdout);
    let fingerprint: Fingerprint = serde_json::from_str(&payload)?;
    debug!(files = fingerprint.len(), "collected asset sizes");
    Ok(fingerprint)
}
