// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Console front end.
//!
//! Prints every state change and inbound message, and sends each line read
//! from stdin to the hub. Exits on EOF or Ctrl-C.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::auth::{spawn_login, TokenAuthenticator};
use crate::config::Config;
use crate::console;
use crate::error::Result;
use crate::logging;
use crate::supervisor::Supervisor;
use crate::transport::WebSocketTransport;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "hublink.toml";

/// Environment variable holding the `--user` password.
pub const PASSWORD_ENV: &str = "HUBLINK_PASSWORD";

#[derive(Parser, Debug)]
#[command(name = "hublink")]
#[command(version)]
#[command(about = "Stay connected to a message hub from the terminal")]
pub struct Cli {
    /// Hub WebSocket URL (overrides the config file)
    #[arg(long)]
    pub url: Option<String>,

    /// Path to the config file
    #[arg(long, short, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Seconds between reconnection attempts (overrides the config file)
    #[arg(long)]
    pub interval: Option<u64>,

    /// Hub method invoked for each input line (overrides the config file)
    #[arg(long)]
    pub send_method: Option<String>,

    /// Wait for the first retry tick instead of connecting on startup
    #[arg(long)]
    pub no_connect: bool,

    /// Log in as this user (password from HUBLINK_PASSWORD); never delays connecting
    #[arg(long)]
    pub user: Option<String>,

    /// Log at debug level
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    /// Loads the config file and applies command-line overrides.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = Config::load(&self.config)?;
        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if let Some(secs) = self.interval {
            config.reconnect_interval_secs = secs;
        }
        if let Some(method) = &self.send_method {
            config.send_method = method.clone();
        }
        if self.no_connect {
            config.connect_immediately = false;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Runs the console until stdin closes or Ctrl-C is pressed.
pub async fn run(cli: Cli) -> Result<()> {
    logging::init(cli.verbose);
    let config = cli.resolve_config()?;

    let transport = Arc::new(WebSocketTransport::new(config.url.clone()));
    let supervisor = Supervisor::spawn(transport, config.supervisor_config());

    // Runs alongside the connection; the hub session does not wait for it.
    let login = cli.user.clone().map(|user| {
        let password = std::env::var(PASSWORD_ENV).unwrap_or_default();
        spawn_login(
            Arc::new(TokenAuthenticator::new(config.auth_url.clone())),
            user,
            password,
        )
    });

    let _states = supervisor.subscribe_state_changes(|change| {
        println!("{}", console::local_status_line(change));
    });
    let receive_method = config.receive_method.clone();
    let _messages = supervisor.subscribe_messages(move |message| {
        if message.method == receive_method {
            println!("{}", console::message_line(message));
        } else {
            debug!(method = %message.method, "ignoring message for unhandled method");
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) if line.trim().is_empty() => {}
                Some(line) => {
                    let args = vec![Value::String(line)];
                    if let Err(e) = supervisor.send(&config.send_method, args).await {
                        eprintln!("error: {}", e);
                    }
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    if let Some(login) = login {
        login.abort();
    }
    supervisor.dispose().await;
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
