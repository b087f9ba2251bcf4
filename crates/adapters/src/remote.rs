//! Remote command runner (§4.2): the sole mechanism this tool uses to
//! touch remote nodes. Wraps `tokio::process::Command`, capturing
//! combined stdout+stderr and mapping a non-zero exit to an error. The
//! caller supplies any timeout via `tokio::time::timeout`; this module
//! does not impose one itself. Every entry point races its process
//! against a `CancellationToken` and kills the child if it fires first
//! (§5, §12).

use std::process::Stdio;

use lrc_core::error::{RecoverError, RemoteStage, Result};
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

/// Output of a completed remote invocation.
pub struct RemoteOutput {
    pub stdout: Vec<u8>,
    pub combined: Vec<u8>,
}

fn log_result(combined: &[u8], success: bool) {
    let text = String::from_utf8_lossy(combined);
    if success {
        tracing::debug!(output = %text, "remote command succeeded");
    } else {
        tracing::warn!(output = %text, "remote command failed");
    }
}

/// Runs `program args...` locally (used by the RPO sampler to invoke
/// tikv-ctl against a local/loopback endpoint) and returns stdout only,
/// matching the upstream tool's `cmd.Output()` call.
pub async fn run_local(program: &str, args: &[&str], cancel: &CancellationToken) -> Result<Vec<u8>> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let outcome = {
        let work = async {
            let mut stdout = Vec::new();
            let mut stderr = Vec::new();
            if let Some(mut out) = child.stdout.take() {
                out.read_to_end(&mut stdout).await?;
            }
            if let Some(mut err) = child.stderr.take() {
                err.read_to_end(&mut stderr).await?;
            }
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((stdout, stderr, status))
        };
        tokio::select! {
            result = work => Some(result),
            _ = cancel.cancelled() => None,
        }
    };

    let (stdout, stderr, status) = match outcome {
        Some(result) => result?,
        None => {
            let _ = child.start_kill();
            return Err(RecoverError::Cancelled);
        }
    };

    log_result(&stderr, status.success());
    if !status.success() {
        return Err(RecoverError::RemoteExec {
            stage: RemoteStage::DropLogs,
            host: "localhost".to_string(),
            port: None,
            source: std::io::Error::other(format!(
                "{program} exited with {:?}",
                status.code()
            )),
        });
    }
    Ok(stdout)
}

/// Runs `cmd args...` on `host` over SSH, returning the captured combined
/// output. `stage` identifies which orchestrator stage this call belongs
/// to, for error attribution.
pub async fn run_ssh(
    user: &str,
    host: &str,
    ssh_port: u16,
    cmd: &str,
    args: &[String],
    stage: RemoteStage,
    port: Option<u16>,
    cancel: &CancellationToken,
) -> Result<RemoteOutput> {
    let target = format!("{user}@{host}");
    let mut full_args: Vec<String> = vec![
        "-p".to_string(),
        ssh_port.to_string(),
        target,
        cmd.to_string(),
    ];
    full_args.extend(args.iter().cloned());

    let mut child = Command::new("ssh")
        .args(&full_args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| RecoverError::RemoteExec {
            stage,
            host: host.to_string(),
            port,
            source,
        })?;

    let outcome = {
        let work = async {
            let mut stdout = Vec::new();
            let mut stderr = Vec::new();
            if let Some(mut out) = child.stdout.take() {
                out.read_to_end(&mut stdout).await?;
            }
            if let Some(mut err) = child.stderr.take() {
                err.read_to_end(&mut stderr).await?;
            }
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((stdout, stderr, status))
        };
        tokio::select! {
            result = work => Some(result),
            _ = cancel.cancelled() => None,
        }
    };

    let (stdout, stderr, status) = match outcome {
        Some(result) => result.map_err(|source| RecoverError::RemoteExec {
            stage,
            host: host.to_string(),
            port,
            source,
        })?,
        None => {
            let _ = child.start_kill();
            return Err(RecoverError::Cancelled);
        }
    };

    let mut combined = stdout.clone();
    combined.extend_from_slice(&stderr);
    log_result(&combined, status.success());

    if !status.success() {
        return Err(RecoverError::RemoteExec {
            stage,
            host: host.to_string(),
            port,
            source: std::io::Error::other(format!("ssh exited with {:?}", status.code())),
        });
    }

    Ok(RemoteOutput { stdout, combined })
}

/// Copies `src` (local) to `user@host:dest` via `scp` (§4.5 step 1).
pub async fn scp_to(
    user: &str,
    host: &str,
    ssh_port: u16,
    src: &str,
    dest: &str,
    cancel: &CancellationToken,
) -> Result<()> {
    let path = format!("{user}@{host}:{dest}");
    let mut child = Command::new("scp")
        .args(["-P", &ssh_port.to_string(), src, &path])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| RecoverError::RemoteExec {
            stage: RemoteStage::Prepare,
            host: host.to_string(),
            port: None,
            source,
        })?;

    let outcome = {
        let work = async {
            let mut stderr = Vec::new();
            if let Some(mut err) = child.stderr.take() {
                err.read_to_end(&mut stderr).await?;
            }
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((stderr, status))
        };
        tokio::select! {
            result = work => Some(result),
            _ = cancel.cancelled() => None,
        }
    };

    let (stderr, status) = match outcome {
        Some(result) => result.map_err(|source| RecoverError::RemoteExec {
            stage: RemoteStage::Prepare,
            host: host.to_string(),
            port: None,
            source,
        })?,
        None => {
            let _ = child.start_kill();
            return Err(RecoverError::Cancelled);
        }
    };

    log_result(&stderr, status.success());
    if !status.success() {
        return Err(RecoverError::RemoteExec {
            stage: RemoteStage::Prepare,
            host: host.to_string(),
            port: None,
            source: std::io::Error::other(format!("scp exited with {:?}", status.code())),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;
