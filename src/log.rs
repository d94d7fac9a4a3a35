//! Logging setup.
//!
//! ## Environment Variable Priority
//!
//! 1. **`GIT_HUNKS_LOG`** - a bare level (`debug`) applies to this crate only;
//!    anything with `=`, `:` or `,` is used as a full filter
//! 2. **`RUST_LOG`** - standard tracing environment variable
//! 3. **Default** - `warn`, raised by `-v` to `info` and by `-vv` to `debug`
//!
//! Logs go to stderr so diff and patch output on stdout stays clean.

use std::env;
use tracing_subscriber::{EnvFilter, fmt};

const CRATE: &str = "git_hunks";

/// Install the global subscriber.
///
/// Safe to call more than once; later calls return an error and leave the
/// first subscriber in place.
pub fn init(verbosity: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = create_filter(
        env::var("GIT_HUNKS_LOG").ok().as_deref(),
        env::var("RUST_LOG").ok().as_deref(),
        verbosity,
    );
    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::new(filter))
        .try_init()?;
    Ok(())
}

/// Initialize logging for tests.
#[allow(clippy::let_unit_value)]
pub fn test() {
    let _ = init(2);
}

fn create_filter(crate_log: Option<&str>, rust_log: Option<&str>, verbosity: u8) -> String {
    if let Some(crate_log) = crate_log {
        return expand_crate_log(crate_log);
    }

    if let Some(rust_log) = rust_log {
        return rust_log.to_string();
    }

    match verbosity {
        0 => "warn".to_string(),
        1 => format!("warn,{CRATE}=info"),
        2 => format!("warn,{CRATE}=debug"),
        _ => format!("warn,{CRATE}=trace"),
    }
}

fn expand_crate_log(crate_log: &str) -> String {
    if crate_log.contains('=') || crate_log.contains(':') || crate_log.contains(',') {
        return crate_log.to_string();
    }

    format!("warn,{CRATE}={crate_log}")
}
