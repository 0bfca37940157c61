//! User-Agent construction.

use std::fmt;

const UNKNOWN: &str = "unknown";

/// Host and HTTP runtime facts reported in the User-Agent. Detected once at start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    pub os_name: String,
    pub os_version: String,
    pub os_arch: String,
    pub vendor: String,
    pub runtime_version: String,
    pub library_version: String,
}

impl RuntimeInfo {
    pub fn detect() -> Self {
        let curl = curl::Version::get();
        Self {
            os_name: sysinfo::System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
            os_version: sysinfo::System::os_version()
                .or_else(sysinfo::System::kernel_version)
                .unwrap_or_else(|| UNKNOWN.to_string()),
            os_arch: std::env::consts::ARCH.to_string(),
            vendor: "libcurl".to_string(),
            runtime_version: curl.version().to_string(),
            library_version: curl.ssl_version().unwrap_or(UNKNOWN).to_string(),
        }
    }
}

/// `{app}/{version} ({os};{osver};{arch}) ({vendor};{runtime-version};{library-version})`
pub struct UserAgent<'a> {
    pub application_name: &'a str,
    pub application_version: &'a str,
    pub runtime: &'a RuntimeInfo,
}

impl fmt::Display for UserAgent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.runtime;
        write!(
            f,
            "{}/{} ({};{};{}) ({};{};{})",
            self.application_name,
            self.application_version,
            r.os_name,
            r.os_version,
            r.os_arch,
            r.vendor,
            r.runtime_version,
            r.library_version
        )
    }
}
