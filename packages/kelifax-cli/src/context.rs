//! Application context with shared state and utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use kelifax_client::{ClientConfig, KelifaxClient};
use kelifax_feed::StaticCatalog;

/// Session file used when `KELIFAX_SESSION_FILE` is not set.
const DEFAULT_SESSION_FILE: &str = ".kelifax/session.json";

/// Application context passed to all commands
pub struct AppContext {
    pub quiet: bool,
    pub config: ClientConfig,
    pub catalog: StaticCatalog,
}

impl AppContext {
    pub fn new(quiet: bool, offline: bool) -> Result<Self> {
        let mut config = ClientConfig::from_env().context("Failed to load configuration")?;
        if offline {
            config.use_api = false;
        }
        if config.session_file.is_none() {
            config.session_file = default_session_file();
        }

        let catalog = StaticCatalog::bundled().context("Bundled catalog is invalid")?;

        Ok(Self {
            quiet,
            config,
            catalog,
        })
    }

    pub fn client(&self) -> Result<KelifaxClient> {
        KelifaxClient::new(self.config.clone()).context("Failed to create API client")
    }

    pub fn theme(&self) -> ColorfulTheme {
        ColorfulTheme::default()
    }

    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.quiet {
            return Ok(default);
        }
        Ok(Confirm::with_theme(&self.theme())
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    pub fn print_header(&self, msg: &str) {
        if !self.quiet {
            println!();
            println!("{}", style(msg).bold());
        }
    }

    pub fn print_success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).green());
        }
    }

    pub fn print_warning(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).yellow());
        }
    }

    pub fn print_info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).cyan());
        }
    }
}

fn default_session_file() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(DEFAULT_SESSION_FILE))
}
