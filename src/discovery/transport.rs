//! Shared outbound HTTP plumbing for the client core.

use reqwest::Client;

use crate::error::{TrackerError, TrackerResult};

/// Build a client. Timeouts are applied per request, not here.
pub fn http_client(use_system_proxy: bool) -> TrackerResult<Client> {
    let builder = Client::builder().user_agent(concat!("caption-tracker/", env!("CARGO_PKG_VERSION")));
    let builder = if use_system_proxy { builder } else { builder.no_proxy() };
    builder.build().map_err(|e| TrackerError::Client(e.to_string()))
}

/// Join a base URL and an absolute path without doubling the slash.
pub fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
