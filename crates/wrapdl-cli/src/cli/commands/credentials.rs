//! `wrapdl credentials <server-id>` – report the settings entry used for a server.

use anyhow::Result;
use wrapdl_core::CredentialResolver;

pub fn run_credentials(server_id: &str, build_args: &[String]) -> Result<()> {
    let resolver = CredentialResolver::from_env();
    match resolver.settings_path(build_args) {
        Some(path) => println!("Settings: {}", path.display()),
        None => println!("Settings: (no user home, no --settings)"),
    }
    match resolver.resolve(build_args, Some(server_id)) {
        Some(creds) => println!("Server {server_id}: username {}", creds.username),
        None => println!("Server {server_id}: no credentials configured"),
    }
    Ok(())
}
