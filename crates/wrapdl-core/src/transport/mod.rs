//! HTTP transport seam.
//!
//! The downloader only depends on [`Transport`]; [`CurlTransport`] is the
//! libcurl implementation used in production, tests plug in recorders.

mod easy;

use std::io;
use url::Url;

use crate::auth::AuthContext;

pub use easy::CurlTransport;

/// One GET: where, as whom, and with which credentials.
#[derive(Debug, Clone, Copy)]
pub struct FetchRequest<'a> {
    pub url: &'a Url,
    pub user_agent: &'a str,
    pub auth: Option<&'a AuthContext>,
}

/// Unrecoverable failure while fetching the response body.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("unsupported scheme {0:?} (expected http or https)")]
    UnsupportedScheme(String),
    #[error("{0}")]
    Curl(#[from] curl::Error),
    #[error("HTTP {0}")]
    Http(u32),
    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

/// Performs a single GET and hands the body to `on_chunk` as it arrives.
///
/// An error from `on_chunk` aborts the transfer and is returned as
/// [`TransferError::Io`]. Statuses outside 2xx are [`TransferError::Http`].
pub trait Transport {
    fn fetch(
        &self,
        request: &FetchRequest<'_>,
        on_chunk: &mut dyn FnMut(&[u8]) -> io::Result<()>,
    ) -> Result<(), TransferError>;
}

/// Rejects anything but http/https before a connection is attempted.
pub fn check_scheme(url: &Url) -> Result<(), TransferError> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(TransferError::UnsupportedScheme(other.to_string())),
    }
}
