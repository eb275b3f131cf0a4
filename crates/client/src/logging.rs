// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing subscriber setup for the console front end.
//!
//! The supervisor reports accepted transitions at `info`, recovered failures
//! at `warn` and ignored transport notifications at `debug`. `RUST_LOG`
//! overrides the level chosen here.

use tracing_subscriber::EnvFilter;

/// Installs a stderr fmt subscriber.
///
/// Does nothing if a global subscriber is already set.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
