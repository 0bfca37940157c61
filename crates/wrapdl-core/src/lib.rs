//! Bootstrap downloader for build-tool wrappers.
//!
//! Fetches a distribution archive to a local path exactly once, answering
//! server and proxy basic-auth challenges with credentials from a Maven-style
//! `settings.xml` and the wrapdl config.

pub mod config;
pub mod logging;

pub mod auth;
pub mod downloader;
pub mod settings;
pub mod transport;
pub mod user_agent;

pub use auth::{AuthContext, ChallengeKind};
pub use downloader::{DownloadError, Downloader};
pub use settings::{CredentialResolver, Credentials};
pub use transport::{CurlTransport, FetchRequest, TransferError, Transport};
pub use user_agent::RuntimeInfo;
