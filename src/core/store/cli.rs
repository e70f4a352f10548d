//! CLI backend.
//!
//! Drives the deployment CLI (`npx convex env ...` by default). Credentials
//! for the active mode are injected into the child's environment; the other
//! mode's variables are set to empty strings so a `.env.local` in the working
//! directory cannot fill them back in.
//!
//! Keys and values always follow a `--` terminator, so `env set -- KEY -x`
//! stores the literal value `-x`.

use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use super::RemoteStore;
use crate::core::constants::{DEPLOY_KEY_VAR, SELF_HOSTED_ADMIN_KEY_VAR, SELF_HOSTED_URL_VAR};
use crate::core::domain::{CloudTarget, CredentialContext};
use crate::error::{RemoteError, RemoteResult};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Status codes that mean the key was rejected, when reported as a status.
const AUTH_STATUS_CODES: &[&str] = &["401", "403"];

/// Words that mark the next number as a response status.
const STATUS_WORDS: &[&str] = &["status", "code", "http"];

/// stderr fragments that mean the key was rejected.
const AUTH_MARKERS: &[&str] = &[
    "unauthorized",
    "forbidden",
    "badadminkey",
    "baddeploykey",
    "invalid admin key",
    "invalid deploy key",
];

/// stderr fragments that mean the deployment could not be reached.
const UNAVAILABLE_MARKERS: &[&str] = &[
    "econnrefused",
    "enotfound",
    "etimedout",
    "fetch failed",
    "network error",
    "socket hang up",
];

/// Remote store reached through the deployment CLI.
pub struct Cli {
    argv: Vec<String>,
    credentials: CredentialContext,
    timeout: Duration,
}

struct Captured {
    status: ExitStatus,
    stdout: String,
    stderr: String,
}

impl Cli {
    /// `argv` is the program plus leading arguments, e.g. `["npx", "convex"]`.
    pub fn new(argv: Vec<String>, credentials: CredentialContext, timeout: Duration) -> Self {
        Self {
            argv,
            credentials,
            timeout,
        }
    }

    /// Full argument list after the program name.
    ///
    /// Options come before `--`; `data` (keys and values) after it.
    fn args(&self, subcommand: &str, data: &[&str]) -> Vec<String> {
        let mut args: Vec<String> = self.argv.iter().skip(1).cloned().collect();
        args.push("env".to_string());
        args.push(subcommand.to_string());

        if let CredentialContext::Cloud {
            target: CloudTarget::Preview(name),
            ..
        } = &self.credentials
        {
            args.push("--preview-name".to_string());
            args.push(name.clone());
        }

        if !data.is_empty() {
            args.push("--".to_string());
            args.extend(data.iter().map(|s| s.to_string()));
        }
        args
    }

    fn command(&self, subcommand: &str, data: &[&str]) -> RemoteResult<Command> {
        let program = self
            .argv
            .first()
            .ok_or_else(|| RemoteError::Unavailable("no CLI command configured".to_string()))?;

        if !program.contains(std::path::MAIN_SEPARATOR) && which::which(program).is_err() {
            return Err(RemoteError::Unavailable(format!(
                "'{}' not found on PATH",
                program
            )));
        }

        let mut cmd = Command::new(program);
        cmd.args(self.args(subcommand, data))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        match &self.credentials {
            CredentialContext::Local { url, admin_key } => {
                cmd.env(SELF_HOSTED_URL_VAR, url)
                    .env(SELF_HOSTED_ADMIN_KEY_VAR, admin_key.expose())
                    .env(DEPLOY_KEY_VAR, "");
            }
            CredentialContext::Cloud { deploy_key, .. } => {
                cmd.env(DEPLOY_KEY_VAR, deploy_key.expose())
                    .env(SELF_HOSTED_URL_VAR, "")
                    .env(SELF_HOSTED_ADMIN_KEY_VAR, "");
            }
        }

        Ok(cmd)
    }

    fn run(&self, subcommand: &str, data: &[&str]) -> RemoteResult<Captured> {
        let mut cmd = self.command(subcommand, data)?;
        debug!(subcommand, "running deployment CLI");

        let mut child = cmd
            .spawn()
            .map_err(|e| RemoteError::Unavailable(format!("failed to start CLI: {}", e)))?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = wait_with_timeout(&mut child, self.timeout)?;

        Ok(Captured {
            status,
            stdout: collect(stdout, "stdout")?,
            stderr: collect(stderr, "stderr")?,
        })
    }
}

impl RemoteStore for Cli {
    fn name(&self) -> &'static str {
        "cli"
    }

    fn get(&self, key: &str) -> RemoteResult<Option<String>> {
        let out = self.run("get", &[key])?;

        if !out.status.success() {
            let text = format!("{}\n{}", out.stderr, out.stdout).to_ascii_lowercase();
            if text.contains("not found") {
                return Ok(None);
            }
            return Err(classify_failure(&out));
        }

        let value = out.stdout.strip_suffix('\n').unwrap_or(out.stdout.as_str());
        let value = value.strip_suffix('\r').unwrap_or(value);
        trace!(key, found = !value.is_empty(), "cli get");
        Ok(Some(value.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> RemoteResult<()> {
        let out = self.run("set", &[key, value])?;
        if !out.status.success() {
            return Err(classify_failure(&out));
        }
        Ok(())
    }

    fn list(&self) -> RemoteResult<Vec<String>> {
        let out = self.run("list", &[])?;
        if !out.status.success() {
            return Err(classify_failure(&out));
        }
        Ok(parse_list_keys(&out.stdout))
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

/// Output of a drained pipe as text. Values must survive intact, so bytes
/// that are not UTF-8 are an error rather than silently dropped.
fn collect(handle: JoinHandle<io::Result<Vec<u8>>>, stream: &str) -> RemoteResult<String> {
    let bytes = handle
        .join()
        .map_err(|_| RemoteError::Protocol(format!("CLI {} reader panicked", stream)))?
        .map_err(|e| RemoteError::Unavailable(format!("failed to read CLI {}: {}", stream, e)))?;

    String::from_utf8(bytes)
        .map_err(|e| RemoteError::Protocol(format!("CLI {} is not valid UTF-8: {}", stream, e)))
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> RemoteResult<ExitStatus> {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(RemoteError::Unavailable(format!(
                    "CLI did not finish within {}s",
                    timeout.as_secs_f32()
                )));
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => return Err(RemoteError::Unavailable(format!("failed to wait for CLI: {}", e))),
        }
    }
}

fn classify_failure(out: &Captured) -> RemoteError {
    let message = out.stderr.trim();
    let message = if message.is_empty() {
        out.stdout.trim()
    } else {
        message
    };
    let lower = message.to_ascii_lowercase();

    if UNAVAILABLE_MARKERS.iter().any(|m| lower.contains(m)) {
        RemoteError::Unavailable(message.to_string())
    } else if AUTH_MARKERS.iter().any(|m| lower.contains(m)) || reports_auth_status(&lower) {
        RemoteError::Authentication(message.to_string())
    } else {
        RemoteError::Rejected {
            status: out
                .status
                .code()
                .and_then(|c| u16::try_from(c).ok())
                .unwrap_or(1),
            message: message.to_string(),
        }
    }
}

/// True when a 401/403 appears as a response status (`status 401`,
/// `HTTP/1.1 403`), not as part of a port, address or key name.
fn reports_auth_status(lower: &str) -> bool {
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    tokens.iter().enumerate().any(|(i, token)| {
        AUTH_STATUS_CODES.contains(token)
            && tokens[i.saturating_sub(3)..i]
                .iter()
                .any(|prev| STATUS_WORDS.contains(prev))
    })
}

/// `env list` prints `NAME=value` lines; continuation lines of multi-line
/// values never look like a valid name followed by `=`.
fn parse_list_keys(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(key, _)| key.trim())
        .filter(|key| crate::core::validation::validate_key(key).is_ok())
        .map(str::to_string)
        .collect()
}
