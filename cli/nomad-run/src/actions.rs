//! GitHub Actions runner integration.
//!
//! Inputs arrive as `INPUT_<NAME>` environment variables (handled by clap's
//! `env` fallbacks). Outputs are appended to the file named by
//! `GITHUB_OUTPUT`, and failures are reported with workflow commands.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// Environment variable naming the step output file.
pub const GITHUB_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// Returns true when the runner has step debug logging enabled.
pub fn runner_debug() -> bool {
    std::env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1")
}

/// Set a step output.
///
/// Without an output file the `name=value` line is echoed on stdout when
/// `echo` is set, and only validated otherwise.
pub fn set_output(name: &str, value: &str, echo: bool) -> Result<()> {
    match std::env::var_os(GITHUB_OUTPUT_ENV) {
        Some(path) if !path.is_empty() => write_output(Path::new(&path), name, value),
        _ => {
            let line = output_line(name, value)?;
            if echo {
                println!("{line}");
            } else {
                debug!(name, value, "Output not echoed");
            }
            Ok(())
        }
    }
}

/// Append one output to a runner output file.
pub fn write_output(path: &Path, name: &str, value: &str) -> Result<()> {
    let line = output_line(name, value)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open output file {:?}", path))?;
    writeln!(file, "{line}").with_context(|| format!("Failed to write output file {:?}", path))?;
    debug!(name, value, "Output set");
    Ok(())
}

fn output_line(name: &str, value: &str) -> Result<String> {
    if name.is_empty() || name.contains(['=', '\n', '\r']) {
        anyhow::bail!("invalid output name {name:?}");
    }
    if value.contains(['\n', '\r']) {
        anyhow::bail!("output {name} must be a single line");
    }
    Ok(format!("{name}={value}"))
}

/// Format a workflow error annotation for `message`.
pub fn error_annotation(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

/// Escape a workflow command payload.
pub fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
