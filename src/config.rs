//! Server configuration
//!
//! Defines the paths and limits the control server operates with. All values
//! have add-on defaults and can be overridden through environment variables
//! for local development and tests.

use std::path::PathBuf;
use std::time::Duration;

/// Control server configuration
///
/// Constructed once at startup and shared with handlers through the router
/// state. The options file and runner directory are owned by the add-on
/// supervisor; this process only reads them.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the add-on options document (JSON, contains `runner_token`)
    pub options_file: PathBuf,

    /// Runner installation directory; working directory for `config.sh`
    /// and location of the `.runner` marker file
    pub runner_dir: PathBuf,

    /// Address the HTTP server binds to (ingress proxies to this)
    pub bind_addr: String,

    /// Upper bound on the unregister command's execution time
    pub unregister_timeout: Duration,

    /// Account the unregister command runs as. `None` runs it as the
    /// server's own user (used by tests).
    pub runas_user: Option<String>,
}

impl Config {
    /// Creates configuration from environment variables with add-on defaults
    ///
    /// Recognized variables:
    /// - OPTIONS_FILE (default: /data/options.json)
    /// - RUNNER_DIR (default: /runner)
    /// - BIND_ADDR (default: 0.0.0.0:8099)
    /// - UNREGISTER_TIMEOUT (seconds, default: 30)
    /// - RUNAS_USER (default: runner; empty disables the privilege switch)
    pub fn from_env() -> Self {
        let defaults = Config::default();

        let options_file = std::env::var("OPTIONS_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.options_file);

        let runner_dir = std::env::var("RUNNER_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.runner_dir);

        let bind_addr = std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr);

        let unregister_timeout = std::env::var("UNREGISTER_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.unregister_timeout);

        let runas_user = match std::env::var("RUNAS_USER") {
            Ok(user) if user.is_empty() => None,
            Ok(user) => Some(user),
            Err(_) => defaults.runas_user,
        };

        Self {
            options_file,
            runner_dir,
            bind_addr,
            unregister_timeout,
            runas_user,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.options_file.as_os_str().is_empty() {
            anyhow::bail!("options_file cannot be empty");
        }

        if self.runner_dir.as_os_str().is_empty() {
            anyhow::bail!("runner_dir cannot be empty");
        }

        if self.bind_addr.is_empty() {
            anyhow::bail!("bind_addr cannot be empty");
        }

        if self.unregister_timeout.is_zero() {
            anyhow::bail!("unregister_timeout must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            options_file: PathBuf::from("/data/options.json"),
            runner_dir: PathBuf::from("/runner"),
            bind_addr: "0.0.0.0:8099".to_string(),
            unregister_timeout: Duration::from_secs(30),
            runas_user: Some("runner".to_string()),
        }
    }
}
