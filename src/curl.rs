//! HTTP by way of the `curl` executable.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use log;

fn finish(url: &str, out: Output) -> Result<Vec<u8>, String> {
    if out.status.success() {
        Ok(out.stdout)
    } else {
        Err(format!(
            "curl {} failed ({}): {}{}",
            url,
            out.status,
            String::from_utf8_lossy(&out.stderr).trim(),
            if out.stdout.is_empty() {
                String::new()
            } else {
                format!(" [{}]", String::from_utf8_lossy(&out.stdout).trim())
            }
        ))
    }
}

pub fn get(url: &str) -> Result<Vec<u8>, String> {
    log::debug!(target: "curl.get", "url={:?}", url);
    let out = Command::new("curl")
        .args(["-sS", "-L", "--fail-with-body"])
        .arg(url)
        .output()
        .map_err(|err| format!("Error in curl::get: {}", err))?;
    finish(url, out)
}

/// POST `body` with the given content type. The body goes through stdin.
pub fn post(url: &str, headers: &[String], content_type: &str, body: &[u8]) -> Result<Vec<u8>, String> {
    log::debug!(target: "curl.post", "url={:?} bytes={}", url, body.len());
    let mut cmd = Command::new("curl");
    cmd.args(["-sS", "--fail-with-body", "-X", "POST"])
        .arg("-H")
        .arg(format!("Content-Type: {}", content_type));
    for h in headers {
        cmd.arg("-H").arg(h);
    }
    let mut child = cmd
        .args(["--data-binary", "@-"])
        .arg(url)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| format!("Error in curl::post: {}", err))?;

    // curl reads the whole body before it sends anything back.
    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(body)
            .map_err(|err| format!("Error writing request body: {}", err))?;
    }
    let out = child
        .wait_with_output()
        .map_err(|err| format!("Error in curl::post: {}", err))?;
    finish(url, out)
}
