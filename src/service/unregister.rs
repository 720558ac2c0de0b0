//! Runner Unregister Service
//!
//! Reads the runner token from the add-on options document and invokes the
//! runner's own `config.sh remove` as a lower-privileged subprocess, bounded
//! by a timeout.
//!
//! The token is always passed as a discrete argv element; no shell string is
//! ever built, so token content cannot be interpreted by a shell.

use std::process::Stdio;
use std::time::Duration;

use serde::Deserialize;
use tokio::process::Command;
use tracing::{error, info};

use crate::config::Config;

/// Script the runner ships for registration management
const CONFIG_SCRIPT: &str = "./config.sh";

/// Service error type
#[derive(Debug)]
pub enum UnregisterError {
    /// Options file missing, unparsable, or without a usable `runner_token`
    ConfigUnreadable(String),
    /// The command did not finish within the configured bound
    CommandTimeout(Duration),
    /// The command ran but exited non-zero; carries captured stderr
    CommandFailed { exit_code: i32, stderr: String },
    /// Spawn or I/O failure outside the command's own control
    Unexpected(std::io::Error),
}

impl From<std::io::Error> for UnregisterError {
    fn from(err: std::io::Error) -> Self {
        UnregisterError::Unexpected(err)
    }
}

pub type Result<T> = std::result::Result<T, UnregisterError>;

/// Shape of the add-on options document, reduced to the field we need
#[derive(Debug, Deserialize)]
struct Options {
    #[serde(default)]
    runner_token: String,
}

/// Reads the runner token from the options document
///
/// Any failure along the way collapses into `ConfigUnreadable`: the caller
/// cannot act differently on a missing file versus corrupt JSON, and the
/// detail still reaches the log.
pub fn read_runner_token(config: &Config) -> Result<String> {
    let raw = std::fs::read_to_string(&config.options_file).map_err(|e| {
        UnregisterError::ConfigUnreadable(format!(
            "cannot read {}: {}",
            config.options_file.display(),
            e
        ))
    })?;

    let options: Options = serde_json::from_str(&raw).map_err(|e| {
        UnregisterError::ConfigUnreadable(format!(
            "cannot parse {}: {}",
            config.options_file.display(),
            e
        ))
    })?;

    if options.runner_token.is_empty() {
        return Err(UnregisterError::ConfigUnreadable(
            "runner_token is missing or empty".to_string(),
        ));
    }

    Ok(options.runner_token)
}

/// Unregisters the runner
///
/// Runs `config.sh remove --token <token>` in the runner directory, as
/// `runas_user` when one is configured. The token is never validated or
/// logged here; it goes straight to the script.
pub async fn unregister(config: &Config) -> Result<()> {
    let token = read_runner_token(config)?;

    // sudo keeps argument-vector semantics across the privilege switch,
    // unlike `su -c` which would force everything back through a shell.
    let mut cmd = match &config.runas_user {
        Some(user) => {
            let mut cmd = Command::new("sudo");
            cmd.arg("-u").arg(user).arg("--").arg(CONFIG_SCRIPT);
            cmd
        }
        None => Command::new(CONFIG_SCRIPT),
    };

    cmd.arg("remove")
        .arg("--token")
        .arg(&token)
        .current_dir(&config.runner_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    info!(
        "Executing unregister command in {}",
        config.runner_dir.display()
    );

    let child = cmd.spawn()?;

    let output = match tokio::time::timeout(config.unregister_timeout, child.wait_with_output())
        .await
    {
        // Dropping the future kills the child via kill_on_drop.
        Err(_) => return Err(UnregisterError::CommandTimeout(config.unregister_timeout)),
        Ok(result) => result?,
    };

    if output.status.success() {
        info!("Runner unregistered successfully");
        return Ok(());
    }

    let exit_code = output.status.code().unwrap_or(-1);
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    error!("Unregister command exited with {}: {}", exit_code, stderr);

    Err(UnregisterError::CommandFailed { exit_code, stderr })
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use std::path::PathBuf;

    /// Builds a config rooted in a temp dir with the privilege switch off
    fn test_config(options_file: PathBuf, runner_dir: PathBuf) -> Config {
        Config {
            options_file,
            runner_dir,
            bind_addr: "127.0.0.1:0".to_string(),
            unregister_timeout: Duration::from_secs(5),
            runas_user: None,
        }
    }

    /// Writes an executable `config.sh` stub into `dir`
    fn write_script(dir: &Path, body: &str) {
        let path = dir.join("config.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn write_options(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("options.json");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_token() {
        let dir = tempfile::tempdir().unwrap();
        let options = write_options(dir.path(), r#"{"runner_token": "AABBCC"}"#);
        let config = test_config(options, dir.path().to_path_buf());
        assert_eq!(read_runner_token(&config).unwrap(), "AABBCC");
    }

    #[test]
    fn test_read_token_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path().join("absent.json"), dir.path().to_path_buf());
        assert!(matches!(
            read_runner_token(&config),
            Err(UnregisterError::ConfigUnreadable(_))
        ));
    }

    #[test]
    fn test_read_token_corrupt_json() {
        let dir = tempfile::tempdir().unwrap();
        let options = write_options(dir.path(), "{not json");
        let config = test_config(options, dir.path().to_path_buf());
        assert!(matches!(
            read_runner_token(&config),
            Err(UnregisterError::ConfigUnreadable(_))
        ));
    }

    #[test]
    fn test_read_token_field_absent() {
        let dir = tempfile::tempdir().unwrap();
        let options = write_options(dir.path(), r#"{"other": true}"#);
        let config = test_config(options, dir.path().to_path_buf());
        assert!(matches!(
            read_runner_token(&config),
            Err(UnregisterError::ConfigUnreadable(_))
        ));
    }

    #[tokio::test]
    async fn test_unregister_success() {
        let dir = tempfile::tempdir().unwrap();
        let options = write_options(dir.path(), r#"{"runner_token": "tok"}"#);
        write_script(dir.path(), "exit 0");
        let config = test_config(options, dir.path().to_path_buf());
        assert!(unregister(&config).await.is_ok());
    }

    #[tokio::test]
    async fn test_unregister_receives_token_as_single_arg() {
        let dir = tempfile::tempdir().unwrap();
        // Token full of shell metacharacters must arrive verbatim in $3.
        let options =
            write_options(dir.path(), r#"{"runner_token": "a b;$(echo pwned)\"x"}"#);
        write_script(
            dir.path(),
            r#"[ "$1" = remove ] && [ "$2" = --token ] && [ "$3" = 'a b;$(echo pwned)"x' ] && [ $# -eq 3 ]"#,
        );
        let config = test_config(options, dir.path().to_path_buf());
        assert!(unregister(&config).await.is_ok());
    }

    #[tokio::test]
    async fn test_unregister_command_failure_captures_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let options = write_options(dir.path(), r#"{"runner_token": "tok"}"#);
        write_script(dir.path(), "echo 'bad credentials' >&2\nexit 2");
        let config = test_config(options, dir.path().to_path_buf());

        match unregister(&config).await {
            Err(UnregisterError::CommandFailed { exit_code, stderr }) => {
                assert_eq!(exit_code, 2);
                assert_eq!(stderr, "bad credentials");
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unregister_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let options = write_options(dir.path(), r#"{"runner_token": "tok"}"#);
        write_script(dir.path(), "sleep 30");
        let mut config = test_config(options, dir.path().to_path_buf());
        config.unregister_timeout = Duration::from_millis(200);

        let started = std::time::Instant::now();
        match unregister(&config).await {
            Err(UnregisterError::CommandTimeout(limit)) => {
                assert_eq!(limit, Duration::from_millis(200));
            }
            other => panic!("expected CommandTimeout, got {other:?}"),
        }
        assert!(started.elapsed() >= Duration::from_millis(200));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_unregister_missing_config_never_spawns() {
        let dir = tempfile::tempdir().unwrap();
        // Script records its invocation; with no options file it must not run.
        write_script(dir.path(), "touch ran.stamp");
        let config = test_config(dir.path().join("absent.json"), dir.path().to_path_buf());

        assert!(matches!(
            unregister(&config).await,
            Err(UnregisterError::ConfigUnreadable(_))
        ));
        assert!(!dir.path().join("ran.stamp").exists());
    }

    #[tokio::test]
    async fn test_unregister_missing_script_is_unexpected() {
        let dir = tempfile::tempdir().unwrap();
        let options = write_options(dir.path(), r#"{"runner_token": "tok"}"#);
        let config = test_config(options, dir.path().to_path_buf());

        assert!(matches!(
            unregister(&config).await,
            Err(UnregisterError::Unexpected(_))
        ));
    }
}
