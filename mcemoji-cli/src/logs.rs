//! Logging setup

use std::env::var;
use tracing::info;

/// Installs a subscriber configured by `RUST_LOG`, if set
pub fn from_env() -> bool {
    if var("RUST_LOG").is_err() {
        return false;
    }

    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
    {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Failed to initialise logging, continuing with none\n{e}");
            false
        }
    }
}

/// Installs a subscriber for the given `-v` count
pub fn from_verbosity(verbosity: u8) {
    if verbosity == 0 {
        return;
    }

    let filter = match verbosity {
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    };

    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        Ok(()) => info!("logging initialised"),
        Err(e) => eprintln!("Failed to initialise logging, continuing with none\n{e}"),
    }
}
