//! Credential lookup in a Maven-style `settings.xml`.
//!
//! Best effort: a missing, unreadable or malformed settings file means
//! "no credentials", logged at debug level and never surfaced to the caller.

mod error;
mod parse;

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use error::SettingsLookupError;

/// Settings file relative to the user home when no `-s`/`--settings` is given.
pub const DEFAULT_SETTINGS_RELATIVE: &str = ".m2/settings.xml";

/// Username/password pair. The password may be empty.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Looks up per-server credentials in the settings file selected by the build args.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    user_home: Option<PathBuf>,
}

impl CredentialResolver {
    /// Resolver using the current user's home directory for the default settings file.
    pub fn from_env() -> Self {
        Self {
            user_home: home::home_dir(),
        }
    }

    /// Resolver with an explicit home directory (tests, embedding).
    pub fn with_user_home(user_home: impl Into<PathBuf>) -> Self {
        Self {
            user_home: Some(user_home.into()),
        }
    }

    /// Settings file for these args: the value after the first `-s`/`--settings`
    /// flag, else `<home>/.m2/settings.xml`. A trailing flag without value is ignored.
    pub fn settings_path(&self, args: &[String]) -> Option<PathBuf> {
        settings_flag(args)
            .map(PathBuf::from)
            .or_else(|| {
                self.user_home
                    .as_ref()
                    .map(|home| home.join(DEFAULT_SETTINGS_RELATIVE))
            })
    }

    /// Credentials configured for `server_id`, if any.
    ///
    /// `None` when `server_id` is absent (no file access), when the file cannot be
    /// read or parsed, when no server matches, or when the matching server has an
    /// empty username.
    pub fn resolve(&self, args: &[String], server_id: Option<&str>) -> Option<Credentials> {
        let server_id = server_id?;
        match self.lookup(args, server_id) {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!("settings lookup for server {:?} failed: {}", server_id, e);
                None
            }
        }
    }

    fn lookup(
        &self,
        args: &[String],
        server_id: &str,
    ) -> Result<Option<Credentials>, SettingsLookupError> {
        let path = self
            .settings_path(args)
            .ok_or(SettingsLookupError::NoUserHome)?;
        let found = read_server(&path, server_id)?;
        let Some(server) = found else {
            tracing::debug!("no server {:?} in {}", server_id, path.display());
            return Ok(None);
        };
        let username = server.username.unwrap_or_default();
        if username.is_empty() {
            tracing::debug!("server {:?} has no username in {}", server_id, path.display());
            return Ok(None);
        }
        tracing::debug!("credentials for server {:?} found in {}", server_id, path.display());
        Ok(Some(Credentials {
            username,
            password: server.password.unwrap_or_default(),
        }))
    }
}

fn settings_flag(args: &[String]) -> Option<&str> {
    args.windows(2)
        .find(|pair| pair[0] == "-s" || pair[0] == "--settings")
        .map(|pair| pair[1].as_str())
}

fn read_server(path: &Path, server_id: &str) -> Result<Option<parse::ServerEntry>, SettingsLookupError> {
    let file = File::open(path).map_err(|source| SettingsLookupError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse::find_server(BufReader::new(file), server_id)
}
