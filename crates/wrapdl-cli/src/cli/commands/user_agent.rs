//! `wrapdl user-agent`

use anyhow::Result;
use wrapdl_core::config::WrapdlConfig;
use wrapdl_core::{Downloader, RuntimeInfo};

pub fn run_user_agent(cfg: &WrapdlConfig, runtime: RuntimeInfo) -> Result<()> {
    println!("{}", Downloader::from_config(cfg, runtime).user_agent());
    Ok(())
}
