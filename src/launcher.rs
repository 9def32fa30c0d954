use std::fmt;
use std::io::{self, Write};
use std::process::Command;

use log;

/// Exit codes follow the shell's conventions for a failed `exec`.
pub const EXIT_NOT_FOUND: i32 = 127;
pub const EXIT_NOT_EXECUTABLE: i32 = 126;

#[derive(Debug)]
pub struct LaunchError {
    pub exit_code: i32,
    pub message: String,
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Hand the process over to `argv`, keeping our stdio and environment.
///
/// On unix the current process image is replaced, so this only returns
/// when there is nothing to launch (`Ok(0)`) or the `exec` failed. The
/// command then owns our pid, exit status and signals. Elsewhere the
/// command runs as a child and its exit code is returned.
pub fn launch(argv: &[String]) -> Result<i32, LaunchError> {
    let Some((program, args)) = argv.split_first() else {
        log::debug!("nothing to launch");
        return Ok(0);
    };

    log::debug!("launching {:?} {:?}", program, args);
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();
    hand_off(program, args)
}

#[cfg(unix)]
fn hand_off(program: &str, args: &[String]) -> Result<i32, LaunchError> {
    use std::os::unix::process::CommandExt;
    let err = Command::new(program).args(args).exec();
    Err(launch_error(program, err))
}

#[cfg(not(unix))]
fn hand_off(program: &str, args: &[String]) -> Result<i32, LaunchError> {
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|e| launch_error(program, e))?;
    Ok(status.code().unwrap_or(1))
}

fn launch_error(program: &str, err: io::Error) -> LaunchError {
    let exit_code = match err.kind() {
        io::ErrorKind::NotFound => EXIT_NOT_FOUND,
        io::ErrorKind::PermissionDenied => EXIT_NOT_EXECUTABLE,
        _ => 1,
    };
    LaunchError {
        exit_code,
        message: format!("{}: {}", program, err),
    }
}
