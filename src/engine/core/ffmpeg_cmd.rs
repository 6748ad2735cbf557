use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

use super::profile::Profile;
use super::types::AudioJob;

/// Apply additional user-provided engine arguments to the command.
/// Uses shell-style parsing so quoted strings with spaces are preserved.
fn apply_additional_args(cmd: &mut Command, additional_args: &str) {
    if additional_args.trim().is_empty() {
        return;
    }

    if let Some(args) = shlex::split(additional_args) {
        for arg in args {
            cmd.arg(arg);
        }
    } else {
        // Unbalanced quotes: fall back to a plain whitespace split
        for arg in additional_args.split_whitespace() {
            cmd.arg(arg);
        }
    }
}

/// Build the conversion command for one job
///
/// `<engine> -i <input> -ac <channels> -ar <rate> -c:a <codec> [extra] <output> -y`
pub fn build_convert_cmd(program: &Path, job: &AudioJob, profile: &Profile) -> Command {
    let mut cmd = Command::new(program);

    cmd.arg("-i").arg(&job.input_path);
    cmd.arg("-ac").arg(profile.channels.to_string());
    cmd.arg("-ar").arg(profile.sample_rate.to_string());
    cmd.arg("-c:a").arg(&profile.audio_codec);

    apply_additional_args(&mut cmd, &profile.additional_args);

    cmd.arg(&job.output_path);
    cmd.arg("-y");

    cmd
}

/// Render a command the way it would be typed in a shell
pub fn format_cmd(cmd: &Command) -> String {
    let args = cmd
        .get_args()
        .map(|arg| {
            let s = arg.to_string_lossy();
            if s.contains(' ') {
                format!("\"{}\"", s)
            } else {
                s.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    format!("{} {}", cmd.get_program().to_string_lossy(), args)
}

/// Run the engine for a single job
///
/// On failure the error carries the engine's stderr, which is the diagnostic
/// shown to the operator.
pub fn run_convert(program: &Path, job: &AudioJob, profile: &Profile) -> Result<()> {
    let mut cmd = build_convert_cmd(program, job, profile);
    debug!(command = %format_cmd(&cmd), "running engine");

    let output = cmd
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("Failed to execute {}", program.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if stderr.is_empty() {
            anyhow::bail!("engine exited with status {}", output.status);
        }
        anyhow::bail!("{}", stderr);
    }

    Ok(())
}
