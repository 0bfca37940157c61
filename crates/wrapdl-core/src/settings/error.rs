//! Settings lookup failure. Never leaves the `settings` module: the resolver
//! logs it and reports "no credentials".

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub(crate) enum SettingsLookupError {
    #[error("open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed settings xml: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("settings xml ended inside <{0}>")]
    Truncated(String),
    #[error("no user home directory to locate settings.xml")]
    NoUserHome,
}
