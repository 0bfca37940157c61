//! CLI for the wrapdl bootstrap downloader.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wrapdl_core::config;
use wrapdl_core::RuntimeInfo;

use commands::{run_credentials, run_fetch, run_user_agent};

/// Top-level CLI for wrapdl.
#[derive(Debug, Parser)]
#[command(name = "wrapdl")]
#[command(about = "wrapdl: one-shot distribution downloader for build-tool wrappers", long_about = None)]
pub struct Cli {
    /// Proxy username (overrides config.toml and WRAPDL_PROXY_USER).
    #[arg(long, global = true, value_name = "USER")]
    pub proxy_user: Option<String>,

    /// Proxy password (overrides config.toml and WRAPDL_PROXY_PASSWORD).
    #[arg(long, global = true, value_name = "PASSWORD")]
    pub proxy_password: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a distribution archive unless the destination already exists.
    Fetch {
        /// HTTP/HTTPS URL; `server-id@host` selects credentials from settings.xml.
        url: String,
        /// Local file to create.
        destination: PathBuf,
        /// Build-tool arguments after `--`; only `-s`/`--settings <file>` is used.
        #[arg(last = true)]
        build_args: Vec<String>,
    },

    /// Show which settings file and username would be used for a server id.
    Credentials {
        /// Server id as written in settings.xml.
        server_id: String,
        /// Build-tool arguments after `--`; only `-s`/`--settings <file>` is used.
        #[arg(last = true)]
        build_args: Vec<String>,
    },

    /// Print the User-Agent sent with downloads.
    UserAgent,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_default()?;
        cfg.apply_overrides(cli.proxy_user, cli.proxy_password);
        tracing::debug!(
            "loaded config: app {}/{}, proxy user set: {}",
            cfg.application_name,
            cfg.application_version,
            cfg.proxy.username.is_some()
        );
        let runtime = RuntimeInfo::detect();

        match cli.command {
            CliCommand::Fetch {
                url,
                destination,
                build_args,
            } => run_fetch(&cfg, runtime, &url, &destination, &build_args)?,
            CliCommand::Credentials {
                server_id,
                build_args,
            } => run_credentials(&server_id, &build_args)?,
            CliCommand::UserAgent => run_user_agent(&cfg, runtime)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
