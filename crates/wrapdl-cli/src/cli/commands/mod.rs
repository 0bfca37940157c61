//! CLI command handlers. Each command is in its own file.

mod credentials;
mod fetch;
mod user_agent;

pub use credentials::run_credentials;
pub use fetch::run_fetch;
pub use user_agent::run_user_agent;
