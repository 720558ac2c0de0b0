//! Runner Status Service
//!
//! Determines whether the runner has completed registration by checking for
//! the marker file the runner's own configuration step writes.

use std::io;
use std::path::Path;

/// Name of the sentinel file the runner writes after registering
const MARKER_FILE: &str = ".runner";

/// Checks whether the runner is configured
///
/// The runner is considered configured exactly when `<runner_dir>/.runner`
/// exists. A missing file is a normal outcome, not an error; only an
/// unexpected filesystem failure (e.g. permission denied on the directory)
/// is reported as `Err`.
pub fn is_configured(runner_dir: &Path) -> io::Result<bool> {
    runner_dir.join(MARKER_FILE).try_exists()
}
