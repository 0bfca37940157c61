//! One-shot distribution download.
//!
//! Skips when the destination already exists, creates the parent directory,
//! resolves authentication for this call only, then streams the body into the
//! destination in `CHUNK_SIZE` pieces while printing progress dots. A failed
//! transfer leaves whatever was written on disk; the next call will then skip.

mod progress;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use url::Url;

use crate::auth::{self, AuthContext};
use crate::config::WrapdlConfig;
use crate::settings::{CredentialResolver, Credentials};
use crate::transport::{check_scheme, CurlTransport, FetchRequest, TransferError, Transport};
use crate::user_agent::{RuntimeInfo, UserAgent};
use progress::ProgressDots;

/// Largest piece of body handled at once.
pub const CHUNK_SIZE: usize = 10_000;
/// Bytes per progress marker.
pub const PROGRESS_THRESHOLD: u64 = 20_000;

const PROGRESS_MARKER: &[u8] = b".";

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("download failed: {0}")]
    Transfer(#[from] TransferError),
}

/// Downloads distribution archives, one call at a time.
pub struct Downloader<T = CurlTransport> {
    application_name: String,
    application_version: String,
    runtime: RuntimeInfo,
    proxy: Option<Credentials>,
    resolver: CredentialResolver,
    transport: T,
}

impl Downloader<CurlTransport> {
    /// Production downloader: libcurl transport, settings looked up under the user's home.
    pub fn from_config(cfg: &WrapdlConfig, runtime: RuntimeInfo) -> Self {
        Self::new(
            cfg,
            runtime,
            CredentialResolver::from_env(),
            CurlTransport::from_config(cfg),
        )
    }
}

impl<T: Transport> Downloader<T> {
    pub fn new(
        cfg: &WrapdlConfig,
        runtime: RuntimeInfo,
        resolver: CredentialResolver,
        transport: T,
    ) -> Self {
        Self {
            application_name: cfg.application_name.clone(),
            application_version: cfg.application_version.clone(),
            runtime,
            proxy: cfg.proxy.credentials(),
            resolver,
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn user_agent(&self) -> String {
        UserAgent {
            application_name: &self.application_name,
            application_version: &self.application_version,
            runtime: &self.runtime,
        }
        .to_string()
    }

    /// Downloads `address` to `destination`, printing progress to stdout.
    pub fn download(
        &self,
        address: &Url,
        destination: &Path,
        args: &[String],
    ) -> Result<(), DownloadError> {
        let stdout = io::stdout();
        let mut console = stdout.lock();
        self.download_with_console(address, destination, args, &mut console)
    }

    /// Like [`download`](Self::download) with an explicit user-facing output.
    pub fn download_with_console(
        &self,
        address: &Url,
        destination: &Path,
        args: &[String],
        console: &mut dyn Write,
    ) -> Result<(), DownloadError> {
        if destination.exists() {
            tracing::debug!("{} exists, skipping download", destination.display());
            return Ok(());
        }
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| DownloadError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let configured = auth::configure(address, args, &self.resolver, self.proxy.as_ref());
        tracing::info!(
            "downloading {} to {}",
            auth::strip_user_info(&configured.address),
            destination.display()
        );

        let result = self.transfer(
            &configured.address,
            configured.context.as_ref(),
            destination,
            console,
        );

        if configured.context.is_some() {
            tracing::trace!("dropping authentication context");
        }
        drop(configured);

        match &result {
            Ok(()) => tracing::info!("downloaded {}", destination.display()),
            Err(e) => tracing::warn!("download to {} failed: {}", destination.display(), e),
        }
        result.map_err(DownloadError::from)
    }

    fn transfer(
        &self,
        address: &Url,
        auth: Option<&AuthContext>,
        destination: &Path,
        console: &mut dyn Write,
    ) -> Result<(), TransferError> {
        let result = self.stream_to(address, auth, destination, console);
        let _ = writeln!(console);
        let _ = console.flush();
        result
    }

    fn stream_to(
        &self,
        address: &Url,
        auth: Option<&AuthContext>,
        destination: &Path,
        console: &mut dyn Write,
    ) -> Result<(), TransferError> {
        // A rejected address must not leave a destination file behind.
        check_scheme(address)?;
        let mut out = BufWriter::new(File::create(destination)?);
        let user_agent = self.user_agent();
        let request = FetchRequest {
            url: address,
            user_agent: &user_agent,
            auth,
        };

        let mut dots = ProgressDots::new(PROGRESS_THRESHOLD);
        let mut sink = |data: &[u8]| -> io::Result<()> {
            for chunk in data.chunks(CHUNK_SIZE) {
                if dots.record(chunk.len()) {
                    let _ = console.write_all(PROGRESS_MARKER);
                    let _ = console.flush();
                }
                out.write_all(chunk)?;
            }
            Ok(())
        };
        let fetched = self.transport.fetch(&request, &mut sink);

        let closed = out.flush();
        fetched?;
        closed?;
        Ok(())
    }
}
