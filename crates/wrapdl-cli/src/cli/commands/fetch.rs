//! `wrapdl fetch <url> <destination> [-- <build args>]`

use anyhow::{Context, Result};
use std::path::Path;
use url::Url;
use wrapdl_core::config::WrapdlConfig;
use wrapdl_core::{Downloader, RuntimeInfo};

pub fn run_fetch(
    cfg: &WrapdlConfig,
    runtime: RuntimeInfo,
    url: &str,
    destination: &Path,
    build_args: &[String],
) -> Result<()> {
    let address = Url::parse(url).with_context(|| format!("invalid URL: {url}"))?;
    let downloader = Downloader::from_config(cfg, runtime);
    downloader
        .download(&address, destination, build_args)
        .with_context(|| format!("fetch {}", destination.display()))?;
    Ok(())
}
