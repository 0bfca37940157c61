//! Per-download authentication context.
//!
//! The URI user-info names the server entry to look up in settings.xml; the
//! proxy credentials come from config. Both travel with a single request in
//! an [`AuthContext`] and are dropped with it, so no credentials outlive the
//! download that resolved them.

use url::Url;

use crate::settings::{CredentialResolver, Credentials};

/// Kind of authentication challenge raised during an HTTP transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeKind {
    /// 407 from a proxy.
    Proxy,
    /// 401 from the origin server.
    Server,
}

/// Credentials available to answer challenges for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    proxy: Option<Credentials>,
    server: Option<Credentials>,
}

impl AuthContext {
    pub fn new(proxy: Option<Credentials>, server: Option<Credentials>) -> Self {
        Self { proxy, server }
    }

    /// Credentials for a challenge of `kind`; dispatch is purely on the kind.
    pub fn challenge(&self, kind: ChallengeKind) -> Option<&Credentials> {
        match kind {
            ChallengeKind::Proxy => self.proxy.as_ref(),
            ChallengeKind::Server => self.server.as_ref(),
        }
    }
}

/// Outcome of [`configure`]: the address to connect to and the context to send with it.
#[derive(Debug, Clone)]
pub struct Configured {
    pub address: Url,
    pub context: Option<AuthContext>,
}

/// Server id used for settings lookup: the decoded user-info of `address`
/// (`user` or `user:password`), or `None` when the URI has none.
pub fn server_id(address: &Url) -> Option<String> {
    let user = decode(address.username());
    match address.password() {
        Some(password) => Some(format!("{}:{}", user, decode(password))),
        None if user.is_empty() => None,
        None => Some(user),
    }
}

fn decode(component: &str) -> String {
    urlencoding::decode(component)
        .map(|c| c.into_owned())
        .unwrap_or_else(|_| component.to_string())
}

/// Decides the address and authentication for one download.
///
/// With neither proxy nor server credentials the address is returned as-is and
/// no context is produced. Otherwise the user-info is stripped from the address
/// and the credentials are carried by the returned [`AuthContext`].
pub fn configure(
    address: &Url,
    args: &[String],
    resolver: &CredentialResolver,
    proxy: Option<&Credentials>,
) -> Configured {
    let server = resolver.resolve(args, server_id(address).as_deref());

    if proxy.is_none() && server.is_none() {
        return Configured {
            address: address.clone(),
            context: None,
        };
    }

    tracing::debug!(
        "authentication configured (proxy: {}, server: {})",
        proxy.is_some(),
        server.is_some()
    );
    Configured {
        address: strip_user_info(address),
        context: Some(AuthContext::new(proxy.cloned(), server)),
    }
}

/// `address` without `user:password@`; the original address if it cannot carry credentials.
pub fn strip_user_info(address: &Url) -> Url {
    let mut stripped = address.clone();
    if stripped.set_username("").is_err() || stripped.set_password(None).is_err() {
        return address.clone();
    }
    stripped
}
